use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use serde::Serialize;

use crate::{auth, message, thread};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    _Auth(#[from] auth::Error),
    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let message = self.to_string();
        let status: StatusCode = match self {
            Self::_Auth(e) => e.into(),
            Self::_Thread(e) => e.into(),
            Self::_Message(e) => e.into(),
        };

        let message = if status.is_server_error() {
            error!("{message}");
            "Something went wrong".to_owned()
        } else {
            debug!("{status}: {message}");
            message
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
