//! Error types for search operations
//!
//! Malformed filter input is never an error; it degrades to an inactive
//! filter. Only resolving the owner's collection can fail.

use crate::error::AppError;
use crate::models::OwnerId;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The store has never seen this owner
    #[error("Owner {0} not found")]
    OwnerNotFound(OwnerId),

    /// The storage collaborator failed
    #[error("Store error: {0}")]
    Store(String),
}

impl From<AppError> for SearchError {
    fn from(err: AppError) -> Self {
        SearchError::Store(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::OwnerNotFound(_) => AppError::NotFound(err.to_string()),
            SearchError::Store(msg) => AppError::Database(msg),
        }
    }
}
