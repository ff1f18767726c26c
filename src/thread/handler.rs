use axum::http::StatusCode;

impl From<super::Error> for StatusCode {
    fn from(e: super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::Forbidden => Self::FORBIDDEN,
            super::Error::DuplicateParticipant(_)
            | super::Error::TooManyParticipants(_)
            | super::Error::NotEnoughParticipants(_)
            | super::Error::_Page(_) => Self::BAD_REQUEST,
            super::Error::_R2d2(_) | super::Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(super) mod api {
    use axum::{
        Extension, Json,
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use serde::Deserialize;

    use crate::pagination::Page;
    use crate::thread::model::NewThreadParams;
    use crate::{auth, thread, user};

    #[derive(Deserialize)]
    pub struct FindAllParams {
        user_id: Option<user::Id>,
        limit: Option<i64>,
        offset: Option<i64>,
    }

    pub async fn find_all(
        Extension(auth_user): Extension<auth::User>,
        thread_service: State<thread::Service>,
        Query(params): Query<FindAllParams>,
    ) -> crate::Result<impl IntoResponse> {
        let page = Page::new(params.limit, params.offset);
        let threads = thread_service
            .list_for_user(Some(&auth_user), params.user_id.as_ref(), &page)
            .await?;

        Ok(Json(threads))
    }

    pub async fn create(
        Extension(auth_user): Extension<auth::User>,
        thread_service: State<thread::Service>,
        Json(params): Json<NewThreadParams>,
    ) -> crate::Result<impl IntoResponse> {
        let thread = thread_service.get_or_create(&auth_user, &params).await?;

        Ok((StatusCode::CREATED, Json(thread)))
    }

    pub async fn find_one(
        Extension(auth_user): Extension<auth::User>,
        thread_service: State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<impl IntoResponse> {
        let thread = thread_service.find_by_id(&auth_user, &id).await?;

        Ok(Json(thread))
    }

    pub async fn delete(
        Extension(auth_user): Extension<auth::User>,
        thread_service: State<thread::Service>,
        Path(id): Path<thread::Id>,
    ) -> crate::Result<impl IntoResponse> {
        thread_service.delete(&auth_user, &id).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
