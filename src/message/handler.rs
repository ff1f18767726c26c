use axum::http::StatusCode;

impl From<super::Error> for StatusCode {
    fn from(e: super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::NotParticipant | super::Error::EmptyText | super::Error::_Page(_) => {
                Self::BAD_REQUEST
            }
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
    use serde::{Deserialize, Serialize};

    use crate::message::model::{MessageDto, NewMessageParams};
    use crate::pagination::Page;
    use crate::{auth, message, thread};

    #[derive(Deserialize)]
    pub struct FindAllParams {
        thread_id: Option<thread::Id>,
        limit: Option<i64>,
        offset: Option<i64>,
    }

    pub async fn find_all(
        Extension(auth_user): Extension<auth::User>,
        message_service: State<message::Service>,
        Query(params): Query<FindAllParams>,
    ) -> crate::Result<impl IntoResponse> {
        let Some(thread_id) = params.thread_id else {
            return Ok(Json(Vec::<MessageDto>::new()));
        };

        let page = Page::new(params.limit, params.offset);
        let messages = message_service
            .list_for_thread(&auth_user, &thread_id, &page)
            .await?;

        Ok(Json(messages))
    }

    pub async fn create(
        Extension(auth_user): Extension<auth::User>,
        message_service: State<message::Service>,
        Json(params): Json<NewMessageParams>,
    ) -> crate::Result<impl IntoResponse> {
        let message = message_service.create(&auth_user, &params).await?;

        Ok((StatusCode::CREATED, Json(message)))
    }

    pub async fn mark_as_read(
        message_service: State<message::Service>,
        Path(id): Path<message::Id>,
    ) -> crate::Result<impl IntoResponse> {
        let message = message_service.mark_as_read(&id).await?;

        Ok(Json(message))
    }

    #[derive(Serialize)]
    pub struct UnreadCount {
        unread_count: i64,
    }

    pub async fn unread_count(
        Extension(auth_user): Extension<auth::User>,
        message_service: State<message::Service>,
    ) -> crate::Result<impl IntoResponse> {
        let unread_count = message_service.unread_count(&auth_user).await?;

        Ok(Json(UnreadCount { unread_count }))
    }
}
