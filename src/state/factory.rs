use crate::config::{StateBackend, StateConfig};
use crate::error::Result;
use crate::models::{Category, Tag, Todo};
use crate::state::{InMemoryStore, TodoStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Seed data file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Create a todo store based on configuration
pub async fn create_store(config: &StateConfig) -> Result<Arc<dyn TodoStore>> {
    match config.backend {
        StateBackend::InMemory => {
            tracing::info!("Initializing in-memory storage backend");
            let store: Arc<dyn TodoStore> = Arc::new(InMemoryStore::new());

            if let Some(ref path) = config.fixtures_path {
                let loaded = load_fixtures(store.as_ref(), path).await?;
                tracing::info!(path = ?path, todos = loaded, "Seeded store from fixtures");
            }

            Ok(store)
        }
    }
}

/// Create an in-memory store (for testing and development)
pub fn create_in_memory_store() -> Arc<dyn TodoStore> {
    Arc::new(InMemoryStore::new())
}

/// Load a JSON fixtures file into `store`, returning the number of todos saved.
///
/// Any invalid row rejects the whole file; a half-seeded store
/// would make search results misleading.
pub async fn load_fixtures(store: &dyn TodoStore, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let fixtures: Fixtures = serde_json::from_str(&raw)?;

    for todo in &fixtures.todos {
        todo.validate()?;
    }
    for category in &fixtures.categories {
        category.validate()?;
    }
    for tag in &fixtures.tags {
        tag.validate()?;
    }

    for category in &fixtures.categories {
        store.save_category(category).await?;
    }
    for tag in &fixtures.tags {
        store.save_tag(tag).await?;
    }
    for todo in &fixtures.todos {
        store.save_todo(todo).await?;
    }

    if fixtures.todos.is_empty() {
        tracing::warn!(path = ?path, "Fixtures file contains no todos");
    }

    Ok(fixtures.todos.len())
}
