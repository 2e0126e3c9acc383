//! Page-number pagination helpers.
//!
//! List endpoints accept `?page=&limit=` (1-based pages). Values are clamped
//! here so the repository layer can trust them.

use serde::Serialize;
use utoipa::ToSchema;

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size.
pub const MAX_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Highest page number accepted; larger requests land on an empty page.
pub const MAX_PAGE: i64 = 1_000_000;

/// Clamp a user-provided page number to `1..=MAX_PAGE`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

/// Row offset for a 1-based page.
pub fn offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(limit.max(0))
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_more: page.saturating_mul(limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(1, 20, 41);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more);
    }

    #[test]
    fn last_page_has_no_more() {
        let p = Pagination::new(3, 20, 41);
        assert!(!p.has_more);
        let empty = Pagination::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_limit(None, DEFAULT_LIMIT, MAX_LIMIT), 20);
        assert_eq!(clamp_limit(Some(0), DEFAULT_LIMIT, MAX_LIMIT), 1);
        assert_eq!(clamp_limit(Some(1000), DEFAULT_LIMIT, MAX_LIMIT), 100);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(offset(3, 20), 40);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let page = clamp_page(Some(i64::MAX));
        assert_eq!(page, MAX_PAGE);
        assert_eq!(offset(page, MAX_LIMIT), (MAX_PAGE - 1) * MAX_LIMIT);
        assert_eq!(offset(i64::MAX, i64::MAX), i64::MAX);
        assert!(!Pagination::new(i64::MAX, MAX_LIMIT, 10).has_more);
    }
}
