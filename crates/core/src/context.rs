//! Per-request execution context.
//!
//! A [`RequestContext`] is built once per request by the API middleware and
//! passed explicitly into every service call. It carries the caller identity
//! (if any) and the correlation id used to tie logs and error responses
//! together.

use serde::Serialize;

use crate::error::{CoreError, ErrorCode};
use crate::types::DbId;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: DbId,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub correlation_id: Option<String>,
    /// Why a presented credential was rejected, if one was.
    pub auth_failure: Option<ErrorCode>,
}

impl RequestContext {
    /// Context for an anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated caller.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_auth_failure(mut self, code: ErrorCode) -> Self {
        self.auth_failure = Some(code);
        self
    }

    /// The caller, or an auth error.
    ///
    /// A rejected token reports its own code (`INVALID_TOKEN`,
    /// `TOKEN_EXPIRED`); a missing one reports `UNAUTHORIZED`.
    pub fn require_identity(&self) -> Result<&Identity, CoreError> {
        match (&self.identity, self.auth_failure) {
            (Some(identity), _) => Ok(identity),
            (None, Some(code)) => Err(CoreError::new(code)),
            (None, None) => Err(CoreError::unauthorized()),
        }
    }

    /// The caller, provided they hold one of `roles`.
    pub fn require_role(&self, roles: &[&str]) -> Result<&Identity, CoreError> {
        let identity = self.require_identity()?;
        if roles.contains(&identity.role.as_str()) {
            Ok(identity)
        } else {
            Err(
                CoreError::forbidden(format!("This action requires one of the roles: {roles:?}"))
                    .context_value("role", identity.role.clone()),
            )
        }
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.identity.as_ref().map(|i| i.user_id)
    }
}

/// Fail with `INSUFFICIENT_PERMISSIONS` unless `owner_id` is the caller.
pub fn ensure_owner(owner_id: DbId, identity: &Identity, entity: &str) -> Result<(), CoreError> {
    if owner_id == identity.user_id {
        Ok(())
    } else {
        Err(CoreError::forbidden(format!(
            "You do not have access to this {}",
            entity.to_lowercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_STUDENT};

    #[test]
    fn anonymous_context_is_unauthorized() {
        let err = RequestContext::anonymous().require_identity().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn rejected_token_reports_its_own_code() {
        let ctx = RequestContext::anonymous().with_auth_failure(ErrorCode::TokenExpired);
        let err = ctx.require_identity().unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn role_check() {
        let ctx = RequestContext::authenticated(Identity::new(Uuid::new_v4(), ROLE_STUDENT));
        assert_matches!(ctx.require_role(&[ROLE_STUDENT]), Ok(_));
        let err = ctx.require_role(&[ROLE_ADMIN]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPermissions);
    }

    #[test]
    fn ownership_is_an_id_equality_check() {
        let me = Identity::new(Uuid::new_v4(), ROLE_STUDENT);
        assert!(ensure_owner(me.user_id, &me, "Bookmark").is_ok());

        let err = ensure_owner(Uuid::new_v4(), &me, "Bookmark").unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPermissions);
        assert_eq!(err.message, "You do not have access to this bookmark");
    }

    #[test]
    fn correlation_id_is_kept() {
        let ctx = RequestContext::anonymous().with_correlation_id("req-1");
        assert_eq!(ctx.correlation_id.as_deref(), Some("req-1"));
        assert!(ctx.user_id().is_none());
    }
}
