//! Search Pipeline
//!
//! Generic search, pagination, sorting, and filtering shared by every
//! resource. The pipeline has three parts:
//!
//! - [`query`]: normalizes raw query-string input into a fully-populated
//!   [`QueryDescriptor`], substituting per-resource defaults for anything
//!   missing or invalid. Never fails.
//! - A [`SearchStore`] applies filter → sort → paginate, in that order, and
//!   reports the pre-pagination match count. Two adapters exist:
//!   [`memory::MemoryStore`] scans an in-process collection and
//!   [`sql::SqlSearcher`] generates the equivalent PostgreSQL statements.
//! - [`result::SearchResult`] carries the page of records, the total, and
//!   the descriptor that was actually applied.
//!
//! Services compose the pieces: normalize with their resource's
//! [`SearchConfig`](query::SearchConfig), then hand the descriptor to their
//! store. Both adapters answer the same descriptor identically, so callers
//! cannot tell the storage backends apart.

pub mod memory;
pub mod query;
pub mod result;
pub mod sql;

pub use memory::{FieldValue, MemoryStore, Searchable};
pub use query::{QueryDescriptor, RawSearchQuery, SearchConfig, SearchDefaults, SortDirection};
pub use result::SearchResult;
pub use sql::SqlSearcher;

use crate::utils::error::AppResult;

/// Storage-backed result assembly strategy.
///
/// Exactly two adapters implement this: the in-memory scan and the SQL
/// statement generator. Descriptors handed in must come from
/// [`SearchConfig::normalize`](query::SearchConfig::normalize) so that field
/// names are known-safe identifiers.
#[allow(async_fn_in_trait)]
pub trait SearchStore<T> {
    async fn search(&self, query: &QueryDescriptor) -> AppResult<SearchResult<T>>;
}
