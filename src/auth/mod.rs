use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::user;

pub mod middleware;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Service = Arc<dyn service::AuthService + Send + Sync>;

#[derive(Deserialize, Serialize)]
struct TokenClaims {
    sub: user::Id,
    #[serde(default)]
    staff: bool,
    exp: u64,
}

/// Authenticated caller. Passed explicitly into every service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    id: user::Id,
    staff: bool,
}

impl User {
    pub const fn new(id: user::Id, staff: bool) -> Self {
        Self { id, staff }
    }

    pub const fn id(&self) -> &user::Id {
        &self.id
    }

    /// Staff users bypass participant-only restrictions.
    pub const fn is_staff(&self) -> bool {
        self.staff
    }
}

impl From<TokenClaims> for User {
    fn from(claims: TokenClaims) -> Self {
        Self::new(claims.sub, claims.staff)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unauthorized to access the resource")]
    Unauthorized,

    #[error(transparent)]
    _JsonWebtoken(#[from] jsonwebtoken::errors::Error),
}

impl From<Error> for StatusCode {
    fn from(_: Error) -> Self {
        Self::UNAUTHORIZED
    }
}
