//! Project entity model and DTOs.

use praxis_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub client_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub status: String,
    pub approval_status: String,
    pub assigned_team_id: Option<DbId>,
    pub view_count: i32,
    pub application_count: i32,
    pub bookmark_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    /// Owning client. Defaults to the caller when omitted.
    pub client_id: Option<DbId>,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 30, message = "at most 30 required skills are allowed"))]
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 30, message = "at most 30 required skills are allowed"))]
    pub required_skills: Option<Vec<String>>,
}

/// Body of `PUT /projects/{id}/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeProjectStatus {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// Body of `POST /projects/{id}/assign-team`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignTeam {
    pub team_id: DbId,
}

/// Resolved filters for project listing. `search` is an `ILIKE` pattern
/// prepared by the caller.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Projects owned by (`client_id`) or created by this user.
    pub managed_by: Option<DbId>,
    pub client_id: Option<DbId>,
    pub status: Option<String>,
    /// Restrict to published + approved projects.
    pub public_only: bool,
    pub skill: Option<String>,
    pub search: Option<String>,
}
