//! Bookmark limits and listing rules.

use crate::error::CoreError;

/// Maximum number of bookmarks a single student may hold.
pub const MAX_BOOKMARKS_PER_STUDENT: i64 = 100;

/// Columns a bookmark list may be sorted by.
pub const SORT_FIELDS: &[&str] = &["created_at", "updated_at", "project_title"];

pub const DEFAULT_SORT_FIELD: &str = "created_at";

pub const MSG_ALREADY_BOOKMARKED: &str = "Project already bookmarked";
pub const MSG_INVALID_IDS: &str = "Some bookmark IDs are invalid";

/// Reject a new bookmark when the student already holds `current_count`.
pub fn check_quota(current_count: i64) -> Result<(), CoreError> {
    if current_count >= MAX_BOOKMARKS_PER_STUDENT {
        return Err(CoreError::not_allowed(format!(
            "Maximum bookmark limit ({MAX_BOOKMARKS_PER_STUDENT}) reached"
        ))
        .context_value("limit", MAX_BOOKMARKS_PER_STUDENT)
        .context_value("current", current_count));
    }
    Ok(())
}

/// Map an allow-listed sort field to its SQL expression in the list query.
pub fn sort_column(field: &str) -> &'static str {
    match field {
        "updated_at" => "b.updated_at",
        "project_title" => "p.title",
        _ => "b.created_at",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn quota_allows_up_to_the_limit() {
        assert!(check_quota(0).is_ok());
        assert!(check_quota(MAX_BOOKMARKS_PER_STUDENT - 1).is_ok());
    }

    #[test]
    fn quota_rejects_at_the_limit() {
        let err = check_quota(MAX_BOOKMARKS_PER_STUDENT).unwrap_err();
        assert_eq!(err.code, ErrorCode::OperationNotAllowed);
        assert!(err.message.contains("Maximum bookmark limit"));
    }

    #[test]
    fn every_sort_field_has_a_column() {
        assert_eq!(sort_column("created_at"), "b.created_at");
        assert_eq!(sort_column("updated_at"), "b.updated_at");
        assert_eq!(sort_column("project_title"), "p.title");
    }
}
