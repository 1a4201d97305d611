//! Builds the per-request [`RequestContext`].
//!
//! A missing `Authorization` header yields an anonymous context. A present
//! but unusable token also yields an anonymous context, with the rejection
//! code recorded so that operations requiring a caller report
//! `INVALID_TOKEN` or `TOKEN_EXPIRED` rather than `UNAUTHORIZED`. Public
//! endpoints keep working either way.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use praxis_core::context::{Identity, RequestContext};
use praxis_core::error::ErrorCode;
use praxis_core::roles::VALID_ROLES;

use crate::auth::jwt::{rejection_code, validate_token, JwtConfig};
use crate::state::AppState;

/// Header carrying the request id set by `SetRequestIdLayer`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_context(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = build_context(req.headers(), &state.config.jwt);
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Derive the context from request headers.
pub fn build_context(headers: &HeaderMap, jwt: &JwtConfig) -> RequestContext {
    let mut ctx = RequestContext::anonymous();

    if let Some(request_id) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_correlation_id(request_id);
    }

    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return ctx;
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "));
    let Some(token) = token else {
        return ctx.with_auth_failure(ErrorCode::InvalidToken);
    };

    match validate_token(token, jwt) {
        Ok(claims) if !VALID_ROLES.contains(&claims.role.as_str()) => {
            tracing::debug!(role = %claims.role, "Rejected token with unknown role");
            ctx.with_auth_failure(ErrorCode::InvalidToken)
        }
        Ok(claims) => {
            let correlation_id = ctx.correlation_id.take();
            let mut ctx = RequestContext::authenticated(Identity::new(claims.sub, claims.role));
            ctx.correlation_id = correlation_id;
            ctx
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            ctx.with_auth_failure(rejection_code(&e))
        }
    }
}

/// The request's [`RequestContext`].
///
/// Falls back to an anonymous context when the middleware is not installed.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Ctx(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use uuid::Uuid;

    use super::*;
    use crate::auth::jwt::generate_access_token;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "context-test-secret".to_string(),
            access_token_expiry_mins: 5,
        }
    }

    #[test]
    fn no_headers_is_anonymous() {
        let ctx = build_context(&HeaderMap::new(), &jwt());
        assert!(ctx.identity.is_none());
        assert!(ctx.auth_failure.is_none());
        assert!(ctx.correlation_id.is_none());
    }

    #[test]
    fn valid_token_and_request_id() {
        let user = Uuid::new_v4();
        let token = generate_access_token(user, "student", &jwt()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-abc"));

        let ctx = build_context(&headers, &jwt());
        assert_eq!(ctx.user_id(), Some(user));
        assert_eq!(ctx.correlation_id.as_deref(), Some("req-abc"));
    }

    #[test]
    fn wrong_scheme_records_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        let ctx = build_context(&headers, &jwt());
        assert!(ctx.identity.is_none());
        assert_eq!(ctx.auth_failure, Some(ErrorCode::InvalidToken));
    }

    #[test]
    fn unknown_role_records_invalid_token() {
        let token = generate_access_token(Uuid::new_v4(), "superuser", &jwt()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());

        let ctx = build_context(&headers, &jwt());
        assert!(ctx.identity.is_none());
        assert_eq!(ctx.auth_failure, Some(ErrorCode::InvalidToken));
    }

    #[test]
    fn bad_signature_records_invalid_token() {
        let other = JwtConfig {
            secret: "someone-else".to_string(),
            access_token_expiry_mins: 5,
        };
        let token = generate_access_token(Uuid::new_v4(), "student", &other).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());

        let ctx = build_context(&headers, &jwt());
        assert_eq!(ctx.auth_failure, Some(ErrorCode::InvalidToken));
        assert_eq!(
            ctx.require_identity().unwrap_err().code,
            ErrorCode::InvalidToken
        );
    }
}
