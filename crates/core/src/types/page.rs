//! One page of a paginated listing.

use serde::{Deserialize, Serialize};

/// A slice of results plus the numbers a table footer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page, in listing order.
    pub items: Vec<T>,
    /// 1-based page number that was requested.
    pub page: usize,
    /// Page size that was applied.
    pub page_size: usize,
    /// Number of records matching the query across all pages.
    pub total_items: usize,
    /// `ceil(total_items / page_size)`; zero when nothing matched.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Total pages for display, never below one.
    ///
    /// Avoids rendering "page 1 of 0" for an empty result.
    #[must_use]
    pub fn display_total_pages(&self) -> usize {
        self.total_pages.max(1)
    }
}

/// Number of pages needed for `total_items` at `page_size` per page.
#[must_use]
pub const fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}
