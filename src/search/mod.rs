//! Owner-scoped todo search
//!
//! A search request flows through a fixed pipeline:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────┐   ┌───────────┐
//! │  RawParams   │──▶│ SearchCriteria│──▶│ filters  │──▶│   sort    │
//! └──────────────┘   └──────────────┘   └──────────┘   └───────────┘
//!                                                             │
//!       ┌──────────────┐   ┌─────────────┐   ┌────────────┐   ▼
//!       │ SearchResult │◀──│ suggestions │◀──│ highlights │◀─ paginate
//!       └──────────────┘   └─────────────┘   └────────────┘
//! ```
//!
//! Parsing is lenient: malformed values deactivate a filter instead of
//! failing the request. Only resolving the owner's collection can fail.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_search::search::{RawParams, SearchConfig, SearchService};
//! use todo_search::state::create_in_memory_store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SearchService::new(create_in_memory_store(), SearchConfig::default());
//!
//!     let params = RawParams::new()
//!         .with("q", "report")
//!         .with("status", serde_json::json!(["pending", "in_progress"]))
//!         .with("sort_by", "due_date");
//!
//!     let result = service.search(42, &params).await?;
//!     println!("Found {} todos", result.meta.total_count);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod criteria;
mod error;
mod filter;
mod highlight;
mod pagination;
mod service;
mod sort;
mod suggestion;

pub use config::{SearchConfig, SearchConfigBuilder, PER_PAGE_CEILING};
pub use criteria::{
    CategoryFilter, FilterKind, FilterWarning, RawParams, SearchCriteria, TagMode, TEXT_PARAMS,
};
pub use error::SearchError;
pub use filter::{apply_filters, matches_criteria, matches_due_range, matches_tags};
pub use highlight::{
    contains_ignore_case, find_matches, highlight_field, highlight_terms, highlight_todo,
    merge_overlapping, Highlight, HighlightField,
};
pub use pagination::{paginate, Pagination};
pub use service::{FiltersApplied, SearchHit, SearchMetadata, SearchResult, SearchService};
pub use sort::{sort_todos, SortDirection, SortField};
pub use suggestion::{find_kind, generate_suggestions, Suggestion, SuggestionKind};
