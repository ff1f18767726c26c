use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use repository::MessageRepository;
use service::MessageService;

use crate::{pagination, state::AppState};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub(crate) type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn MessageRepository + Send + Sync>;
pub type Service = Arc<dyn MessageService + Send + Sync>;

uuid_id!(Id);

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/messages", get(handler::api::find_all))
        .route("/messages", post(handler::api::create))
        .route("/messages/unread", get(handler::api::unread_count))
        .route("/messages/{id}/read", post(handler::api::mark_as_read))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message not found: {0}")]
    NotFound(Id),
    #[error("sender is not a participant of the thread")]
    NotParticipant,
    #[error("message text must not be blank")]
    EmptyText,

    #[error(transparent)]
    _Page(#[from] pagination::Error),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}
