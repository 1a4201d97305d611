//! Boundary error type and its JSON rendering.
//!
//! Every handler returns [`AppResult`]. [`AppError`] is classified into a
//! [`HandledError`] (status, body, severity, operational flag) which
//! `IntoResponse` renders and also stores in the response extensions, where
//! the error filter picks it up to log, notify and report.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use praxis_core::error::{CoreError, ErrorCode, ErrorContext, Severity};
use praxis_core::types::Timestamp;
use praxis_core::validation::ValidationError;
use serde::Serialize;

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A classified domain error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Per-field failures raised by service-level checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A framework-level HTTP failure (unmatched route, bad method, timeout).
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// The request body or query string did not have the expected shape.
    #[error("Malformed request: {}", .0.join(", "))]
    Malformed(Vec<String>),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            message: message.into(),
        }
    }

    /// Turn this error into its response body plus the metadata the error
    /// filter acts on.
    pub fn classify(&self) -> HandledError {
        let detail = format!("{self:?}");
        match self {
            AppError::Malformed(messages) => HandledError {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse::new(
                    ErrorCode::ValidationError,
                    ErrorMessage::Many(messages.clone()),
                    None,
                    chrono::Utc::now(),
                ),
                severity: Severity::Low,
                operational: true,
                detail,
            },
            AppError::Http { status, message } => HandledError {
                status: *status,
                body: ErrorResponse::new(
                    ErrorCode::from_http_status(status.as_u16()),
                    ErrorMessage::One(message.clone()),
                    None,
                    chrono::Utc::now(),
                ),
                severity: if status.is_server_error() {
                    Severity::High
                } else {
                    Severity::Low
                },
                operational: true,
                detail,
            },
            AppError::Core(core) => HandledError::from_core(core, detail),
            AppError::Validation(validation) => HandledError::from_core(validation.core(), detail),
            AppError::Database(err) => HandledError::from_core(&classify_sqlx_error(err), detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.classify().into_response()
    }
}

// ---------------------------------------------------------------------------
// Response body
// ---------------------------------------------------------------------------

/// A single message, or one line per failing field for malformed requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// The JSON body of every error response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: &'static str,
    pub code: ErrorCode,
    pub message: ErrorMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Debug rendering of the underlying error, when stack traces are on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(
        code: ErrorCode,
        message: ErrorMessage,
        context: Option<ErrorContext>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            status: "error",
            code,
            message,
            context,
            timestamp,
            path: None,
            method: None,
            correlation_id: None,
            stack: None,
        }
    }
}

/// A classified error, carried in the response extensions.
#[derive(Debug, Clone)]
pub struct HandledError {
    pub status: StatusCode,
    pub body: ErrorResponse,
    pub severity: Severity,
    pub operational: bool,
    /// Internal detail for logs, crash reports and the optional `stack`.
    pub detail: String,
}

impl HandledError {
    fn from_core(core: &CoreError, detail: String) -> Self {
        let status = StatusCode::from_u16(core.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            body: ErrorResponse::new(
                core.code,
                ErrorMessage::One(core.message.clone()),
                core.context.clone(),
                core.timestamp,
            ),
            severity: core.severity,
            operational: core.operational,
            detail,
        }
    }
}

impl IntoResponse for HandledError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(self.body.clone());
        let mut response = (status, body).into_response();
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}

// ---------------------------------------------------------------------------
// Database errors
// ---------------------------------------------------------------------------

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error onto the error taxonomy.
///
/// - `RowNotFound` -> `NOT_FOUND`.
/// - Unique violations -> `ALREADY_EXISTS`, with the constraint name.
/// - Foreign key violations -> `NOT_FOUND`.
/// - Everything else -> critical, non-operational `DATABASE_ERROR` with a
///   sanitized message. The original error is logged, never returned.
pub fn classify_sqlx_error(err: &sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => CoreError::with_message(ErrorCode::NotFound, "Resource not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(PG_UNIQUE_VIOLATION) => {
                let error = CoreError::already_exists("Resource already exists");
                match db_err.constraint() {
                    Some(constraint) => error.context_value("constraint", constraint),
                    None => error,
                }
            }
            Some(PG_FOREIGN_KEY_VIOLATION) => {
                CoreError::with_message(ErrorCode::NotFound, "Referenced resource not found")
            }
            _ => {
                tracing::error!(error = %db_err, "Database error");
                CoreError::critical(ErrorCode::DatabaseError, "A database error occurred")
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            CoreError::critical(ErrorCode::DatabaseError, "A database error occurred")
        }
    }
}
