//! Search Results
//!
//! The page of records returned by a search, together with the total match
//! count and the descriptor that was actually applied.

use serde::Serialize;

use super::query::QueryDescriptor;

/// One page of search results.
///
/// `total` counts every record matching the filter before pagination, so
/// `items.len()` is at most `query.page_size` and may be smaller on the last
/// page (or zero past the end).
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    /// Records on this page, in sorted order
    pub items: Vec<T>,

    /// Post-filter, pre-pagination match count
    pub total: u64,

    /// The normalized query these results answer
    pub query: QueryDescriptor,
}

impl<T> SearchResult<T> {
    pub fn new(items: Vec<T>, total: u64, query: QueryDescriptor) -> Self {
        Self {
            items,
            total,
            query,
        }
    }

    /// Number of pages needed to cover every match
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.query.page_size))
    }

    /// Whether a later page still holds records
    pub fn has_next_page(&self) -> bool {
        u64::from(self.query.page) < self.total_pages()
    }
}
