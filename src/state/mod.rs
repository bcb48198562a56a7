pub mod store;
pub mod factory;

pub use store::*;
pub use factory::{create_in_memory_store, create_store, load_fixtures, Fixtures};

use crate::error::Result;
use crate::models::{Category, OwnerId, Tag, Todo, TodoId};
use async_trait::async_trait;

/// Trait for owner-scoped todo storage.
///
/// Every read takes the owner explicitly; implementations must never return
/// a row belonging to a different owner.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert or replace a todo
    async fn save_todo(&self, todo: &Todo) -> Result<()>;

    /// Get a todo by ID, visible only to its owner
    async fn get_todo(&self, owner_id: OwnerId, id: TodoId) -> Result<Option<Todo>>;

    /// Delete a todo owned by `owner_id`
    async fn delete_todo(&self, owner_id: OwnerId, id: TodoId) -> Result<()>;

    /// All todos belonging to `owner_id`, ordered by ID
    async fn todos_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Todo>>;

    /// Whether the store has ever seen this owner
    async fn owner_exists(&self, owner_id: OwnerId) -> Result<bool>;

    /// Allocate a fresh todo ID
    async fn next_todo_id(&self) -> Result<TodoId>;

    /// Insert or replace a category
    async fn save_category(&self, category: &Category) -> Result<()>;

    /// Insert or replace a tag
    async fn save_tag(&self, tag: &Tag) -> Result<()>;

    /// All categories belonging to `owner_id`
    async fn categories_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Category>>;

    /// All tags belonging to `owner_id`
    async fn tags_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Tag>>;
}
