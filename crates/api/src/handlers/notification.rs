//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use praxis_core::error::CoreError;
use praxis_core::listing::Paginated;
use praxis_core::types::DbId;
use praxis_db::models::notification::Notification;
use praxis_db::repositories::NotificationRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ValidatedPath, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::query::NotificationListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/notifications
///
/// The caller's notifications, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<NotificationListQuery>,
) -> AppResult<Json<DataResponse<Paginated<Notification>>>> {
    let page = query.page_request();
    let items =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, query.unread_only, page).await?;
    let total = NotificationRepo::count_for_user(&state.pool, auth.user_id, query.unread_only).await?;

    Ok(DataResponse::new(Paginated::new(items, total, page)))
}

/// POST /api/v1/notifications/{id}/read
///
/// 204 on success, 404 if the notification is not the caller's or is
/// already read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(notification_id): ValidatedPath<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;
    if !found {
        return Err(CoreError::not_found("Notification", notification_id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(DataResponse::new(MarkedRead { marked_read }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(DataResponse::new(UnreadCount { count }))
}
