//! Role names carried in access tokens.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_CLIENT: &str = "client";
pub const ROLE_INSTITUTION: &str = "institution";
pub const ROLE_ADMIN: &str = "admin";

/// All roles recognised by the platform.
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_CLIENT, ROLE_INSTITUTION, ROLE_ADMIN];
