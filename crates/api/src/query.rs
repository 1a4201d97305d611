//! Query parameter types for list endpoints.
//!
//! Paging values are clamped, not rejected: see
//! [`PageRequest::new`](praxis_core::listing::PageRequest::new).

use praxis_core::listing::PageRequest;
use praxis_core::types::DbId;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookmarkListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Substring of the project title.
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,
    pub project_status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProjectListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Substring of the title or description.
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    /// Only projects requiring this skill.
    pub skill: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ExperienceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,
    pub status: Option<String>,
    pub tag: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct NotificationListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Blank filter values are treated as absent.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some("   ".into())), None);
        assert_eq!(non_blank(&Some(" draft ".into())), Some("draft".to_string()));
    }

    #[test]
    fn pagination_params_clamp() {
        let params = NotificationListQuery {
            page: Some(-3),
            limit: Some(1000),
            unread_only: false,
        };
        assert_eq!(params.page_request(), PageRequest { page: 1, limit: 100 });
    }
}
