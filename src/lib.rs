//! Owner-scoped todo search and retrieval.
//!
//! The [`search`] module holds the engine: criteria parsing, filtering,
//! sorting, pagination, highlighting and empty-result suggestions. The
//! remaining modules carry the plumbing to run it as a service.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;
pub mod state;
