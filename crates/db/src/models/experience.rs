//! Experience entity model and DTOs.

use chrono::NaiveDate;
use praxis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An experience row from the `experiences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Experience {
    pub id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an experience. New experiences are always drafts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExperience {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(length(max = 20, message = "at most 20 tags are allowed"))]
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for updating an experience. All fields are optional.
///
/// `description` and `end_date` distinguish an absent field (keep) from an
/// explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateExperience {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[validate(length(max = 20, message = "at most 20 tags are allowed"))]
    pub tags: Option<Vec<String>>,
}

/// Resolved filters for experience listing.
#[derive(Debug, Clone, Default)]
pub struct ExperienceFilter {
    pub status: Option<String>,
    pub tag: Option<String>,
    /// `ILIKE` pattern matched against title and description.
    pub search: Option<String>,
}
