use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use log::debug;

use crate::auth;

const BEARER: &str = "Bearer ";

pub async fn authorize(
    auth_service: State<auth::Service>,
    mut req: Request,
    next: Next,
) -> crate::Result<Response> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER))
        .map(str::to_owned)
        .ok_or(auth::Error::Unauthorized)?;

    let auth_user = auth_service.validate(&token).await?;
    debug!("Authorized {:?}", auth_user.id());

    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}
