//! Authenticated-caller extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use praxis_core::context::RequestContext;
use praxis_core::types::DbId;

use super::context::Ctx;
use crate::error::AppError;

/// The authenticated caller, taken from the request context.
///
/// Rejects with `UNAUTHORIZED`, `INVALID_TOKEN` or `TOKEN_EXPIRED` when
/// there is no usable token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
    /// The full context, for passing on to services.
    pub ctx: RequestContext,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ctx(ctx) = match Ctx::from_request_parts(parts, state).await {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        };
        let identity = ctx.require_identity()?.clone();
        Ok(AuthUser {
            user_id: identity.user_id,
            role: identity.role,
            ctx,
        })
    }
}
