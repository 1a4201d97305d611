//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use praxis_api::error::{AppError, HandledError};
use praxis_core::bookmark::check_quota;
use praxis_core::error::{CoreError, ErrorCode, Severity};
use praxis_core::validation::ValidationError;
use uuid::Uuid;

/// Convert an `AppError` into its status, parsed JSON body and the
/// classification left for the error filter.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value, Arc<HandledError>) {
    let response = err.into_response();
    let status = response.status();
    let handled = response
        .extensions()
        .get::<Arc<HandledError>>()
        .cloned()
        .expect("error responses carry their classification");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json, handled)
}

#[tokio::test]
async fn not_found_error_returns_404_with_context() {
    let id = Uuid::new_v4();
    let err = AppError::Core(CoreError::not_found("Project", id));

    let (status, json, handled) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Project not found");
    assert_eq!(json["context"]["id"], id.to_string());
    assert!(json["timestamp"].is_string());
    assert_eq!(handled.severity, Severity::Medium);
    assert!(handled.operational);
}

#[tokio::test]
async fn quota_error_returns_403() {
    let err = AppError::Core(check_quota(100).unwrap_err());

    let (status, json, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "OPERATION_NOT_ALLOWED");
    assert_eq!(json["message"], "Maximum bookmark limit (100) reached");
}

#[tokio::test]
async fn already_exists_returns_409() {
    let err = AppError::Core(CoreError::already_exists("Project already bookmarked"));

    let (status, json, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn validation_error_lists_fields() {
    let err = AppError::Validation(ValidationError::single(
        "end_date",
        "end_date must not be before start_date",
    ));

    let (status, json, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["context"]["errors"][0]["field"], "end_date");
}

#[tokio::test]
async fn malformed_request_returns_message_list() {
    let err = AppError::Malformed(vec![
        "title: title is required".into(),
        "notes: notes must be at most 1000 characters".into(),
    ]);

    let (status, json, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn http_error_takes_code_from_status() {
    let err = AppError::http(StatusCode::NOT_FOUND, "Cannot GET /nope");

    let (status, json, handled) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Cannot GET /nope");
    assert_eq!(handled.severity, Severity::Low);
}

#[tokio::test]
async fn database_error_is_sanitized_and_critical() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json, handled) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "DATABASE_ERROR");
    assert_eq!(json["message"], "A database error occurred");
    assert_eq!(handled.severity, Severity::Critical);
    assert!(!handled.operational);
    assert!(handled.detail.contains("PoolTimedOut"));
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json, _) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unfinished_body_has_no_request_fields() {
    let (_, json, handled) =
        error_to_response(AppError::Core(CoreError::new(ErrorCode::Unauthorized))).await;

    // Path, method and correlation id are filled in by the error filter.
    assert!(json.get("path").is_none());
    assert!(json.get("correlationId").is_none());
    assert_matches!(handled.body.code, ErrorCode::Unauthorized);
}
