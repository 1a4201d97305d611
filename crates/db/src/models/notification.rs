//! Notification entity model.

use praxis_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert payload for a notification.
#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub user_id: DbId,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub data: &'a serde_json::Value,
}
