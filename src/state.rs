use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::service::AuthServiceImpl;
use crate::message::repository::PgMessageRepository;
use crate::message::service::MessageServiceImpl;
use crate::thread::repository::PgThreadRepository;
use crate::thread::service::ThreadServiceImpl;
use crate::{auth, integration, message, thread};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_service: auth::Service,
    pub thread_service: thread::Service,
    pub message_service: message::Service,
}

impl AppState {
    pub fn new(
        auth_service: auth::Service,
        thread_service: thread::Service,
        message_service: message::Service,
    ) -> Self {
        Self {
            auth_service,
            thread_service,
            message_service,
        }
    }

    pub fn init(config: &integration::Config) -> integration::Result<Self> {
        let pool = config.db.connect()?;

        let thread_repo = PgThreadRepository::new(pool.clone());
        let message_repo = PgMessageRepository::new(pool);

        Ok(Self::new(
            Arc::new(AuthServiceImpl::new(&config.idp)),
            Arc::new(ThreadServiceImpl::new(Arc::new(thread_repo))),
            Arc::new(MessageServiceImpl::new(Arc::new(message_repo))),
        ))
    }
}
