//! Project lifecycle rules.
//!
//! Projects move through `draft -> published -> in_progress -> completed`,
//! with `cancelled` reachable from any non-terminal state. Publishing
//! additionally requires admin approval, and a project that has been
//! assigned to a team can no longer be deleted.

use crate::context::{ensure_owner, Identity};
use crate::error::CoreError;
use crate::listing::normalize_labels;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_PUBLISHED,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

pub const APPROVAL_PENDING: &str = "pending";
pub const APPROVAL_APPROVED: &str = "approved";

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

pub const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "title",
    "view_count",
    "application_count",
    "bookmark_count",
];

pub const DEFAULT_SORT_FIELD: &str = "created_at";

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `draft`       -> `published`, `cancelled`
/// - `published`   -> `in_progress`, `draft`, `cancelled`
/// - `in_progress` -> `completed`, `cancelled`
/// - `completed`, `cancelled` are terminal
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_DRAFT => &[STATUS_PUBLISHED, STATUS_CANCELLED],
        STATUS_PUBLISHED => &[STATUS_IN_PROGRESS, STATUS_DRAFT, STATUS_CANCELLED],
        STATUS_IN_PROGRESS => &[STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::invalid_input(format!(
            "Invalid project status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::invalid_state(format!(
            "Cannot move project from '{current}' to '{next}'"
        ))
        .context_value("allowed", allowed.to_vec()))
    }
}

/// `in_progress` is only entered through team assignment.
pub fn validate_manual_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if next == STATUS_IN_PROGRESS {
        return Err(CoreError::invalid_state(
            "Assign a team to start work on a project",
        ));
    }
    validate_transition(current, next)
}

/// Listed in the public catalogue: published and approved.
pub fn is_public(status: &str, approval_status: &str) -> bool {
    status == STATUS_PUBLISHED && approval_status == APPROVAL_APPROVED
}

/// True when `identity` owns the project (its client) or created it.
pub fn is_manager(client_id: DbId, created_by: DbId, identity: &Identity) -> bool {
    identity.user_id == client_id || identity.user_id == created_by
}

/// Fail with `INSUFFICIENT_PERMISSIONS` unless `identity` manages the project.
pub fn ensure_manager(client_id: DbId, created_by: DbId, identity: &Identity) -> Result<(), CoreError> {
    if is_manager(client_id, created_by, identity) {
        Ok(())
    } else {
        ensure_owner(client_id, identity, "Project")
    }
}

/// Publishing requires admin approval.
pub fn ensure_publishable(approval_status: &str) -> Result<(), CoreError> {
    if approval_status == APPROVAL_APPROVED {
        Ok(())
    } else {
        Err(CoreError::invalid_state(
            "Project must be approved before publishing",
        ))
    }
}

/// A project assigned to a team cannot be deleted.
pub fn ensure_deletable(assigned_team_id: Option<DbId>) -> Result<(), CoreError> {
    match assigned_team_id {
        None => Ok(()),
        Some(team_id) => Err(CoreError::not_allowed(
            "Cannot delete a project assigned to a team",
        )
        .context_value("assigned_team_id", team_id.to_string())),
    }
}

/// Completed and cancelled projects are read-only.
pub fn ensure_editable(status: &str) -> Result<(), CoreError> {
    if status == STATUS_COMPLETED || status == STATUS_CANCELLED {
        Err(CoreError::invalid_state(format!(
            "A {status} project can no longer be edited"
        )))
    } else {
        Ok(())
    }
}

/// Only a published project can be handed to a team.
pub fn ensure_assignable(status: &str, assigned_team_id: Option<DbId>) -> Result<(), CoreError> {
    if assigned_team_id.is_some() {
        return Err(CoreError::already_exists(
            "Project is already assigned to a team",
        ));
    }
    if status != STATUS_PUBLISHED {
        return Err(CoreError::invalid_state(
            "Only published projects can be assigned to a team",
        ));
    }
    Ok(())
}

/// Trim, drop blanks and de-duplicate required skills, keeping order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    normalize_labels(skills)
}

/// Map an allow-listed sort field to its column.
pub fn sort_column(field: &str) -> &'static str {
    SORT_FIELDS
        .iter()
        .copied()
        .find(|f| *f == field)
        .unwrap_or(DEFAULT_SORT_FIELD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
