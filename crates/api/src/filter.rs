//! The error filter: one middleware that finishes every error response.
//!
//! Handlers and extractors return [`AppError`]s, whose `IntoResponse`
//! leaves a [`HandledError`] in the response extensions. This middleware
//! picks it up and, according to [`ErrorHandlingConfig`]:
//!
//! - fills in `path`, `method` and `correlationId`;
//! - drops `context` unless context capture is on, adds `stack` if enabled;
//! - logs at a level matching the severity;
//! - pushes an `error` notification to the caller;
//! - spawns a crash report for CRITICAL errors.
//!
//! Responses without a [`HandledError`] pass through untouched.
//!
//! [`ErrorHandlingConfig`]: crate::config::ErrorHandlingConfig

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use praxis_core::context::RequestContext;
use praxis_core::error::{CoreError, ErrorCode, Severity};
use praxis_events::NotificationPush;

use crate::error::{AppError, ErrorMessage, ErrorResponse, HandledError};
use crate::reporting::{spawn_report, ErrorReport};
use crate::state::AppState;

pub async fn error_filter(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let mut response = next.run(req).await;

    let Some(handled) = response.extensions().get::<Arc<HandledError>>().cloned() else {
        return response;
    };

    let config = &state.config.errors;
    let mut body = handled.body.clone();
    body.path = Some(path);
    body.method = Some(method);
    body.correlation_id = ctx.correlation_id.clone();

    if config.enable_logging {
        log_error(&handled, &body);
    }

    if let Some(user_id) = ctx.user_id() {
        if config
            .notify_frontend
            .should_notify(handled.severity, handled.operational)
        {
            let push = NotificationPush::new(user_id, "error", "Request failed", message_text(&body.message))
                .with_data(serde_json::json!({
                    "code": body.code,
                    "path": body.path,
                    "correlationId": body.correlation_id,
                }));
            state.notifier.push(&ctx, push);
        }
    }

    if handled.severity == Severity::Critical && config.crash_reporting {
        let report = ErrorReport {
            code: body.code,
            message: message_text(&body.message),
            severity: handled.severity,
            context: body.context.clone(),
            path: body.path.clone(),
            method: body.method.clone(),
            correlation_id: body.correlation_id.clone(),
            timestamp: body.timestamp,
            detail: handled.detail.clone(),
        };
        spawn_report(Arc::clone(&state.reporter), report);
    }

    if !config.capture_context {
        body.context = None;
    }
    if config.include_stack_trace {
        body.stack = Some(handled.detail.clone());
    }

    match serde_json::to_vec(&body) {
        Ok(bytes) => {
            response.headers_mut().remove(CONTENT_LENGTH);
            *response.body_mut() = Body::from(bytes);
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize error response"),
    }
    response
}

fn log_error(handled: &HandledError, body: &ErrorResponse) {
    let code = body.code.as_str();
    let status = handled.status.as_u16();
    let path = body.path.as_deref().unwrap_or_default();
    let method = body.method.as_deref().unwrap_or_default();
    let correlation_id = body.correlation_id.as_deref();
    let message = message_text(&body.message);

    match handled.severity {
        Severity::Critical | Severity::High => tracing::error!(
            code,
            status,
            method,
            path,
            correlation_id,
            severity = %handled.severity,
            operational = handled.operational,
            detail = %handled.detail,
            "{message}"
        ),
        Severity::Medium => tracing::warn!(code, status, method, path, correlation_id, "{message}"),
        Severity::Low => tracing::info!(code, status, method, path, correlation_id, "{message}"),
    }
}

fn message_text(message: &ErrorMessage) -> String {
    match message {
        ErrorMessage::One(text) => text.clone(),
        ErrorMessage::Many(lines) => lines.join("; "),
    }
}

// ---------------------------------------------------------------------------
// Framework-level fallbacks
// ---------------------------------------------------------------------------

/// Unmatched routes, rendered through the error filter.
pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    AppError::http(
        StatusCode::NOT_FOUND,
        format!("Cannot {method} {}", uri.path()),
    )
    .into_response()
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    AppError::http(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {method} is not allowed on {}", uri.path()),
    )
    .into_response()
}

/// Abort handlers that run longer than `REQUEST_TIMEOUT_SECS` with a
/// `TIMEOUT` error (504), so the filter renders it like any other error.
pub async fn request_timeout(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limit = Duration::from_secs(state.config.request_timeout_secs);
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%method, path = %path, timeout_secs = limit.as_secs(), "Request timed out");
            AppError::Core(CoreError::new(ErrorCode::Timeout)).into_response()
        }
    }
}
