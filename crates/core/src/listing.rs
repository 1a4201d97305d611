//! Pagination, sorting and search helpers shared by list endpoints.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page number honoured; larger requests are clamped to it.
pub const MAX_PAGE: i64 = 1_000_000;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A clamped, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Page defaults to 1 and is capped at [`MAX_PAGE`]; limit defaults to
    /// [`DEFAULT_PAGE_SIZE`] capped at [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata computed from a count query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMeta {
    pub fn new(total: i64, page: PageRequest) -> Self {
        let total = total.max(0);
        let pages = (total + page.limit - 1) / page.limit;
        Self {
            total,
            page: page.page,
            limit: page.limit,
            pages,
            has_next: page.page < pages,
            has_previous: page.page > 1,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: PageRequest) -> Self {
        Self {
            items,
            meta: PageMeta::new(total, page),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` in any case; anything else (or nothing) is DESC.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Resolve a requested sort field against an allow-list.
///
/// The returned value is always one of the `allowed` entries, so it is safe
/// to interpolate into SQL.
pub fn resolve_sort_field(
    requested: Option<&str>,
    allowed: &[&'static str],
    default: &'static str,
) -> Result<&'static str, CoreError> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(field) => allowed
            .iter()
            .copied()
            .find(|candidate| *candidate == field)
            .ok_or_else(|| {
                CoreError::invalid_input(format!(
                    "Cannot sort by '{field}'. Allowed fields: {}",
                    allowed.join(", ")
                ))
            }),
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Build an `ILIKE` pattern for a case-insensitive substring match.
///
/// LIKE wildcards in the input are escaped. Returns `None` for blank input.
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Trim entries, drop empty ones and remove duplicates, keeping first
/// occurrences in order. Used for skill and tag lists.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            out.push(label.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::new(Some(0), Some(500)), PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(0)).limit, 1);
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn huge_page_is_clamped_without_overflow() {
        let page = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.offset(), (MAX_PAGE - 1) * 100);

        let meta = PageMeta::new(3, page);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn page_meta_computes_navigation() {
        let meta = PageMeta::new(45, PageRequest::new(Some(2), Some(20)));
        assert_eq!(meta.pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);

        let last = PageMeta::new(45, PageRequest::new(Some(3), Some(20)));
        assert!(!last.has_next);

        let empty = PageMeta::new(0, PageRequest::default());
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn sort_field_allow_list() {
        const ALLOWED: &[&str] = &["created_at", "title"];
        assert_eq!(resolve_sort_field(None, ALLOWED, "created_at").unwrap(), "created_at");
        assert_eq!(resolve_sort_field(Some("title"), ALLOWED, "created_at").unwrap(), "title");

        let err = resolve_sort_field(Some("password; DROP TABLE"), ALLOWED, "created_at")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern(Some("  rust ")), Some("%rust%".to_string()));
        assert_eq!(search_pattern(Some("100%_")), Some("%100\\%\\_%".to_string()));
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(None), None);
    }

    #[test]
    fn labels_are_trimmed_and_deduplicated() {
        let input = vec![
            " Rust ".to_string(),
            "".to_string(),
            "SQL".to_string(),
            "rust".to_string(),
        ];
        assert_eq!(normalize_labels(&input), ["Rust", "SQL"]);
    }
}
