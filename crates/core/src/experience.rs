//! Experience lifecycle rules and per-student quotas.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::listing::normalize_labels;
use crate::validation::ValidationError;

pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_PUBLISHED: &str = "PUBLISHED";
pub const STATUS_ARCHIVED: &str = "ARCHIVED";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED, STATUS_ARCHIVED];

/// A student may hold at most this many drafts at once.
pub const MAX_DRAFT_EXPERIENCES: i64 = 5;

/// A student may have at most this many published experiences.
pub const MAX_PUBLISHED_EXPERIENCES: i64 = 10;

pub const SORT_FIELDS: &[&str] = &["created_at", "updated_at", "title", "start_date"];
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// - `DRAFT`     -> `PUBLISHED`, `ARCHIVED`
/// - `PUBLISHED` -> `ARCHIVED`, `DRAFT`
/// - `ARCHIVED`  -> `DRAFT`
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_DRAFT => &[STATUS_PUBLISHED, STATUS_ARCHIVED],
        STATUS_PUBLISHED => &[STATUS_ARCHIVED, STATUS_DRAFT],
        STATUS_ARCHIVED => &[STATUS_DRAFT],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::invalid_input(format!(
            "Invalid experience status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::invalid_state(format!(
            "Cannot move experience from {current} to {next}"
        )))
    }
}

/// Reject a new draft when the student already holds `draft_count` drafts.
pub fn check_draft_quota(draft_count: i64) -> Result<(), CoreError> {
    if draft_count >= MAX_DRAFT_EXPERIENCES {
        return Err(CoreError::not_allowed(format!(
            "Maximum of {MAX_DRAFT_EXPERIENCES} draft experiences reached. \
             Publish or delete a draft first"
        ))
        .context_value("limit", MAX_DRAFT_EXPERIENCES));
    }
    Ok(())
}

/// Reject publishing when the student already has `published_count`.
pub fn check_published_quota(published_count: i64) -> Result<(), CoreError> {
    if published_count >= MAX_PUBLISHED_EXPERIENCES {
        return Err(CoreError::not_allowed(format!(
            "Maximum of {MAX_PUBLISHED_EXPERIENCES} published experiences reached. \
             Archive one first"
        ))
        .context_value("limit", MAX_PUBLISHED_EXPERIENCES));
    }
    Ok(())
}

pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    normalize_labels(tags)
}

/// `end_date`, when present, must not precede `start_date`.
pub fn validate_date_range(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match end_date {
        Some(end) if end < start_date => Err(ValidationError::single(
            "end_date",
            "end_date must not be before start_date",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn draft_quota() {
        assert!(check_draft_quota(4).is_ok());
        let err = check_draft_quota(5).unwrap_err();
        assert_eq!(err.code, ErrorCode::OperationNotAllowed);
    }

    #[test]
    fn published_quota() {
        assert!(check_published_quota(9).is_ok());
        let err = check_published_quota(10).unwrap_err();
        assert_eq!(err.code, ErrorCode::OperationNotAllowed);
        assert!(err.message.contains("published experiences"));
    }

    #[test]
    fn transitions() {
        assert!(validate_transition(STATUS_DRAFT, STATUS_PUBLISHED).is_ok());
        assert!(validate_transition(STATUS_PUBLISHED, STATUS_ARCHIVED).is_ok());
        assert!(validate_transition(STATUS_ARCHIVED, STATUS_DRAFT).is_ok());
        assert!(validate_transition(STATUS_ARCHIVED, STATUS_PUBLISHED).is_err());
        assert!(validate_transition(STATUS_PUBLISHED, STATUS_PUBLISHED).is_err());
        assert!(validate_transition(STATUS_PUBLISHED, STATUS_DRAFT).is_ok());
    }

    #[test]
    fn date_range() {
        assert!(validate_date_range(date(2025, 1, 1), None).is_ok());
        assert!(validate_date_range(date(2025, 1, 1), Some(date(2025, 1, 1))).is_ok());
        let err = validate_date_range(date(2025, 2, 1), Some(date(2025, 1, 1))).unwrap_err();
        assert_eq!(err.errors()[0].field, "end_date");
    }

    #[test]
    fn status_names_are_upper_case() {
        assert!(validate_status("DRAFT").is_ok());
        assert!(validate_status("draft").is_err());
    }
}
