pub mod handlers;
pub mod owner;
pub mod routes;

pub use owner::{AuthenticatedOwner, OWNER_HEADER};
pub use routes::*;

use crate::search::SearchService;
use crate::state::TodoStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, search: Arc<SearchService>) -> Self {
        Self { store, search }
    }
}
