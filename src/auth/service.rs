use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use log::debug;

use crate::integration::idp;

use super::TokenClaims;

#[async_trait]
pub trait AuthService {
    async fn validate(&self, token: &str) -> super::Result<super::User>;
}

pub struct AuthServiceImpl {
    decoding_key: DecodingKey,
    jwt_validator: Validation,
}

impl AuthServiceImpl {
    pub fn new(cfg: &idp::Config) -> Self {
        let jwt_validator = {
            let mut v = Validation::new(Algorithm::HS256);
            let mut required = vec!["exp", "sub"];
            if let Some(issuer) = cfg.issuer() {
                v.set_issuer(&[issuer]);
                required.push("iss");
            }
            if let Some(audience) = cfg.audience() {
                v.set_audience(&[audience]);
                required.push("aud");
            }
            v.set_required_spec_claims(&required);
            v
        };

        Self {
            decoding_key: DecodingKey::from_secret(cfg.secret().as_bytes()),
            jwt_validator,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn validate(&self, token: &str) -> super::Result<super::User> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.jwt_validator)
            .inspect_err(|e| debug!("Token rejected: {e}"))?;

        Ok(data.claims.into())
    }
}
