//! Application error taxonomy.
//!
//! Every failure raised by the domain layer is a [`CoreError`] carrying an
//! [`ErrorCode`] from a fixed table. Codes are grouped into numeric bands
//! (general, validation, auth, resource, business logic, external service),
//! and each code owns a default message and an HTTP status. The API layer
//! turns a `CoreError` into a response through that table; nothing else in
//! the system decides statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Structured diagnostic payload attached to an error.
pub type ErrorContext = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// ErrorBand
// ---------------------------------------------------------------------------

/// Numeric band an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBand {
    General,
    Validation,
    Auth,
    Resource,
    BusinessLogic,
    ExternalService,
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Enumerated error codes.
///
/// The discriminant is the numeric code; the thousands digit is the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum ErrorCode {
    // General (1xxx)
    UnknownError = 1000,
    InternalError = 1001,
    ServiceUnavailable = 1002,
    Timeout = 1003,

    // Validation (2xxx)
    ValidationError = 2000,
    InvalidInput = 2001,
    MissingRequiredField = 2002,
    InvalidFormat = 2003,

    // Auth (3xxx)
    Unauthorized = 3000,
    InvalidToken = 3001,
    TokenExpired = 3002,
    InsufficientPermissions = 3003,

    // Resource (4xxx)
    NotFound = 4000,
    AlreadyExists = 4001,
    Conflict = 4002,

    // Business logic (5xxx)
    BusinessRuleViolation = 5000,
    InvalidState = 5001,
    OperationNotAllowed = 5002,
    QuotaExceeded = 5003,

    // External service (6xxx)
    ExternalServiceError = 6000,
    ApiError = 6001,
    DatabaseError = 6002,
    CacheError = 6003,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::UnknownError,
        ErrorCode::InternalError,
        ErrorCode::ServiceUnavailable,
        ErrorCode::Timeout,
        ErrorCode::ValidationError,
        ErrorCode::InvalidInput,
        ErrorCode::MissingRequiredField,
        ErrorCode::InvalidFormat,
        ErrorCode::Unauthorized,
        ErrorCode::InvalidToken,
        ErrorCode::TokenExpired,
        ErrorCode::InsufficientPermissions,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::Conflict,
        ErrorCode::BusinessRuleViolation,
        ErrorCode::InvalidState,
        ErrorCode::OperationNotAllowed,
        ErrorCode::QuotaExceeded,
        ErrorCode::ExternalServiceError,
        ErrorCode::ApiError,
        ErrorCode::DatabaseError,
        ErrorCode::CacheError,
    ];

    /// Stable wire name, e.g. `"NOT_FOUND"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::BusinessRuleViolation => "BUSINESS_RULE_VIOLATION",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::OperationNotAllowed => "OPERATION_NOT_ALLOWED",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
        }
    }

    /// Numeric code, e.g. `4000` for `NOT_FOUND`.
    pub fn numeric(self) -> u16 {
        self as u16
    }

    pub fn band(self) -> ErrorBand {
        match self.numeric() / 1000 {
            1 => ErrorBand::General,
            2 => ErrorBand::Validation,
            3 => ErrorBand::Auth,
            4 => ErrorBand::Resource,
            5 => ErrorBand::BusinessLogic,
            _ => ErrorBand::ExternalService,
        }
    }

    /// Human-readable message used when an error is raised without one.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "An unknown error occurred",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::Timeout => "The operation timed out",
            ErrorCode::ValidationError => "Validation failed",
            ErrorCode::InvalidInput => "Invalid input provided",
            ErrorCode::MissingRequiredField => "A required field is missing",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::InvalidToken => "Invalid authentication token",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::InsufficientPermissions => {
                "You do not have permission to perform this action"
            }
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::Conflict => "Resource conflict",
            ErrorCode::BusinessRuleViolation => "Business rule violation",
            ErrorCode::InvalidState => "Invalid state for this operation",
            ErrorCode::OperationNotAllowed => "Operation not allowed",
            ErrorCode::QuotaExceeded => "Quota exceeded",
            ErrorCode::ExternalServiceError => "External service error",
            ErrorCode::ApiError => "External API request failed",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::CacheError => "Cache error",
        }
    }

    /// HTTP status this code is reported with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::Unauthorized | ErrorCode::InvalidToken | ErrorCode::TokenExpired => 401,
            ErrorCode::InsufficientPermissions | ErrorCode::OperationNotAllowed => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::AlreadyExists | ErrorCode::Conflict => 409,
            ErrorCode::ValidationError
            | ErrorCode::InvalidInput
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFormat => 400,
            ErrorCode::BusinessRuleViolation | ErrorCode::InvalidState => 422,
            ErrorCode::QuotaExceeded => 429,
            ErrorCode::ExternalServiceError | ErrorCode::ApiError => 502,
            ErrorCode::ServiceUnavailable => 503,
            ErrorCode::Timeout => 504,
            ErrorCode::DatabaseError
            | ErrorCode::CacheError
            | ErrorCode::InternalError
            | ErrorCode::UnknownError => 500,
        }
    }

    /// Best-matching code for an HTTP status raised outside the domain layer.
    pub fn from_http_status(status: u16) -> ErrorCode {
        match status {
            400 => ErrorCode::InvalidInput,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::InsufficientPermissions,
            404 => ErrorCode::NotFound,
            408 | 504 => ErrorCode::Timeout,
            409 => ErrorCode::Conflict,
            422 => ErrorCode::BusinessRuleViolation,
            429 => ErrorCode::QuotaExceeded,
            502 => ErrorCode::ExternalServiceError,
            503 => ErrorCode::ServiceUnavailable,
            s if (400..500).contains(&s) => ErrorCode::InvalidInput,
            _ => ErrorCode::InternalError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// Map an error code's wire name to its HTTP status.
///
/// Total over all strings: anything that is not a known code maps to 500.
pub fn status_for_code(code: &str) -> u16 {
    code.parse::<ErrorCode>()
        .map(ErrorCode::http_status)
        .unwrap_or(500)
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How serious an error is. Drives notification and crash-reporting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CoreError
// ---------------------------------------------------------------------------

/// A classified application error.
///
/// Operational errors (`operational == true`) are expected domain failures
/// such as a missing record or an exhausted quota. Non-operational errors are
/// unexpected and get reported to the crash tracker when critical.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct CoreError {
    pub code: ErrorCode,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    pub operational: bool,
    pub timestamp: Timestamp,
}

impl CoreError {
    /// Create an error with the code's default message and MEDIUM severity.
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Medium,
            context: None,
            operational: true,
            timestamp: chrono::Utc::now(),
        }
    }

    /// A HIGH severity, operational error.
    pub fn high(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_message(code, message).with_severity(Severity::High)
    }

    /// A CRITICAL severity, non-operational error.
    pub fn critical(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_message(code, message)
            .with_severity(Severity::Critical)
            .non_operational()
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Replace the whole context payload.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a single key to the context payload.
    pub fn context_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context
            .get_or_insert_with(ErrorContext::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn non_operational(mut self) -> Self {
        self.operational = false;
        self
    }

    // -- Shorthands ---------------------------------------------------------

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InsufficientPermissions, message)
    }

    /// `"{entity} not found"` with the id in the context.
    pub fn not_found(entity: &str, id: DbId) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{entity} not found"))
            .context_value("entity", entity)
            .context_value("id", id.to_string())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, message)
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::OperationNotAllowed, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidState, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidInput, message)
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BusinessRuleViolation, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::critical(ErrorCode::InternalError, message)
    }

    /// HTTP status from the code table.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
