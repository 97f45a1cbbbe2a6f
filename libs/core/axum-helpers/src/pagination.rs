//! Page-based pagination with server-enforced limits.
//!
//! Query parameters are `page` (1-based) and `page_size`. The requested
//! page size is clamped to [`MAX_PAGE_SIZE`], never rejected, so clients
//! asking for oversized pages still get a valid response.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size applied when the client does not send `page_size`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard upper bound for `page_size`; larger requests are clamped to this.
pub const MAX_PAGE_SIZE: u64 = 100;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
pub struct Pagination {
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u64,
    /// Requested page size (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Normalize the requested parameters: page is at least 1, page size is
    /// between 1 and [`MAX_PAGE_SIZE`].
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to fetch for this page.
    pub fn limit(&self) -> u64 {
        self.clamped().page_size
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        let p = self.clamped();
        (p.page - 1) * p.page_size
    }
}

/// A single page of results with traversal metadata.
///
/// `next`/`previous` carry the adjacent page indices (or null at the
/// edges) so a client can walk the full result set deterministically.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: u64,
    /// 1-based index of this page
    pub page: u64,
    /// Effective (clamped) page size
    pub page_size: u64,
    /// Next page index, if any
    pub next: Option<u64>,
    /// Previous page index, if any
    pub previous: Option<u64>,
}

impl<T> Page<T> {
    /// Assemble a page envelope from a result slice and the total count.
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let p = pagination.clamped();
        let total_pages = total.div_ceil(p.page_size);

        Self {
            items,
            total,
            page: p.page,
            page_size: p.page_size,
            next: (p.page < total_pages).then_some(p.page + 1),
            previous: (p.page > 1).then_some(p.page - 1),
        }
    }

    /// Map the items of this page, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            next: self.next,
            previous: self.previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_oversized_page_size_is_clamped_not_rejected() {
        let p = Pagination::new(1, 1000).clamped();
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_zero_values_are_normalized() {
        let p = Pagination::new(0, 0).clamped();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
    }

    #[test]
    fn test_offset_and_limit() {
        let p = Pagination::new(3, 25);
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_page_navigation_metadata() {
        // 45 items, 10 per page -> 5 pages
        let middle: Page<u64> = Page::new(vec![], 45, Pagination::new(3, 10));
        assert_eq!(middle.next, Some(4));
        assert_eq!(middle.previous, Some(2));

        let first: Page<u64> = Page::new(vec![], 45, Pagination::new(1, 10));
        assert_eq!(first.next, Some(2));
        assert_eq!(first.previous, None);

        let last: Page<u64> = Page::new(vec![], 45, Pagination::new(5, 10));
        assert_eq!(last.next, None);
        assert_eq!(last.previous, Some(4));
    }

    #[test]
    fn test_empty_result_has_no_navigation() {
        let page: Page<u64> = Page::new(vec![], 0, Pagination::default());
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert_eq!(page.total, 0);
    }
}
