use crate::api::AppState;
use crate::domain::auth::Claims;
use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, Request, header, request::Parts},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// The authenticated caller, resolved from the bearer token the external
/// identity provider issued.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION).ok_or(AppError::AuthError)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::AuthError)?;
        let token = auth_str.strip_prefix("Bearer ").ok_or(AppError::AuthError)?;

        let claims = Claims::decode(token, &state.config.auth.jwt_secret)?;

        Ok(Self { user_id: claims.sub })
    }
}

/// Reuses an incoming `x-request-id` header when present, otherwise mints a
/// fresh UUID.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(id) = request.headers().get("x-request-id") {
            return Some(RequestId::new(id.clone()));
        }
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
