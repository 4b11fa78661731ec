//! Bearer JWT authentication
//!
//! Mutating requests always need a valid token; reads only when
//! `protect_reads` is set. The token's `sub` becomes the [`Actor`] recorded
//! as `created_by`/`updated_by`.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ncobase_config::AuthConfig;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::context::ApiContext;
use crate::errors::{RestError, RestResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

pub struct JwtManager {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn protect_reads(&self) -> bool {
        self.config.protect_reads
    }

    /// Issue a token for `user_id`; the server itself only verifies
    pub fn generate_token(&self, user_id: &str) -> RestResult<String> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.config.token_expiry.as_secs() as i64,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RestError::InternalError(format!("Failed to generate token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> RestResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("JWT verification failed: {}", e);
                RestError::unauthorized("Invalid or expired token")
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// Authenticated caller, absent on open reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Actor>().cloned().unwrap_or_default())
    }
}

pub async fn authenticate(State(ctx): State<ApiContext>, mut request: Request, next: Next) -> RestResult<Response> {
    let required = is_mutating(request.method()) || ctx.auth.protect_reads();

    let actor = match bearer_token(request.headers()) {
        Some(token) => match ctx.auth.verify_token(token) {
            Ok(claims) => {
                debug!("Authenticated request from {}", claims.sub);
                Actor(Some(claims.sub))
            }
            Err(err) if required => return Err(err),
            Err(_) => Actor::default(),
        },
        None if required => return Err(RestError::unauthorized("Authentication required")),
        None => Actor::default(),
    };

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}
