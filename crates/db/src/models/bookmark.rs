//! Bookmark entity model and DTOs.

use praxis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A bookmark row from the `bookmarks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bookmark {
    pub id: DbId,
    pub student_id: DbId,
    pub project_id: DbId,
    /// The user who shared the project with this student, if any.
    pub shared_by: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A bookmark joined with the project summary shown in lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookmarkWithProject {
    pub id: DbId,
    pub student_id: DbId,
    pub project_id: DbId,
    pub shared_by: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub project_title: String,
    pub project_status: String,
    pub project_required_skills: Vec<String>,
}

/// DTO for creating a bookmark.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookmark {
    pub project_id: DbId,
    pub shared_by: Option<DbId>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// DTO for updating a bookmark.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBookmark {
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

/// DTO for deleting several bookmarks at once.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkDeleteBookmarks {
    #[validate(length(max = 100, message = "ids must contain at most 100 entries"))]
    #[serde(default)]
    pub ids: Vec<DbId>,
}

/// Resolved filters for bookmark listing.
#[derive(Debug, Clone, Default)]
pub struct BookmarkFilter {
    pub project_status: Option<String>,
    /// `ILIKE` pattern matched against the project title.
    pub search: Option<String>,
}
