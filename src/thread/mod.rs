use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use repository::ThreadRepository;
use service::ThreadService;

use crate::{pagination, state::AppState, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub(crate) type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn ThreadRepository + Send + Sync>;
pub type Service = Arc<dyn ThreadService + Send + Sync>;

uuid_id!(Id);

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/threads", get(handler::api::find_all))
        .route("/threads", post(handler::api::create))
        .route("/threads/{id}", get(handler::api::find_one))
        .route("/threads/{id}", delete(handler::api::delete))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("thread not found: {0}")]
    NotFound(Id),
    #[error("not allowed to delete the thread")]
    Forbidden,
    #[error("participant listed more than once: {0}")]
    DuplicateParticipant(user::Id),
    #[error("a thread must have exactly 2 participants, got {0}")]
    TooManyParticipants(usize),
    #[error("a thread must have exactly 2 participants, got {0}")]
    NotEnoughParticipants(usize),

    #[error(transparent)]
    _Page(#[from] pagination::Error),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}
