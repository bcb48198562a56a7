use crate::error::{AppError, Result};
use crate::models::{Category, CategoryId, OwnerId, Tag, TagId, Todo, TodoId};
use crate::state::TodoStore;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// In-memory todo store backed by `DashMap`, with a per-owner ID index so
/// owner scoping never scans other users' rows. Category and tag ids are
/// only unique per owner, so those rows are keyed by `(owner_id, id)`.
#[derive(Clone)]
pub struct InMemoryStore {
    todos: Arc<DashMap<TodoId, Todo>>,
    owner_index: Arc<DashMap<OwnerId, BTreeSet<TodoId>>>,
    owners: Arc<DashSet<OwnerId>>,
    categories: Arc<DashMap<(OwnerId, CategoryId), Category>>,
    tags: Arc<DashMap<(OwnerId, TagId), Tag>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            todos: Arc::new(DashMap::new()),
            owner_index: Arc::new(DashMap::new()),
            owners: Arc::new(DashSet::new()),
            categories: Arc::new(DashMap::new()),
            tags: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of todos across all owners
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn save_todo(&self, todo: &Todo) -> Result<()> {
        let previous = self.todos.insert(todo.id, todo.clone());

        // Ownership moved: drop the stale index entry
        if let Some(previous) = previous {
            if previous.owner_id != todo.owner_id {
                if let Some(mut ids) = self.owner_index.get_mut(&previous.owner_id) {
                    ids.remove(&todo.id);
                }
            }
        }

        self.owner_index
            .entry(todo.owner_id)
            .or_default()
            .insert(todo.id);
        self.owners.insert(todo.owner_id);
        self.next_id.fetch_max(todo.id + 1, Ordering::SeqCst);

        tracing::debug!(todo_id = todo.id, owner_id = todo.owner_id, "Todo saved");
        Ok(())
    }

    async fn get_todo(&self, owner_id: OwnerId, id: TodoId) -> Result<Option<Todo>> {
        Ok(self
            .todos
            .get(&id)
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.clone()))
    }

    async fn delete_todo(&self, owner_id: OwnerId, id: TodoId) -> Result<()> {
        let removed = self
            .todos
            .remove_if(&id, |_, todo| todo.owner_id == owner_id);

        match removed {
            Some(_) => {
                if let Some(mut ids) = self.owner_index.get_mut(&owner_id) {
                    ids.remove(&id);
                }
                tracing::debug!(todo_id = id, owner_id, "Todo deleted");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Todo {} not found", id))),
        }
    }

    async fn todos_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Todo>> {
        // Copy the IDs out first so no index shard stays locked while reading todos
        let ids: Vec<TodoId> = match self.owner_index.get(&owner_id) {
            Some(ids) => ids.iter().copied().collect(),
            None => return Ok(Vec::new()),
        };

        Ok(ids
            .into_iter()
            .filter_map(|id| self.todos.get(&id).map(|entry| entry.clone()))
            .filter(|todo| todo.owner_id == owner_id)
            .collect())
    }

    async fn owner_exists(&self, owner_id: OwnerId) -> Result<bool> {
        Ok(self.owners.contains(&owner_id))
    }

    async fn next_todo_id(&self) -> Result<TodoId> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn save_category(&self, category: &Category) -> Result<()> {
        self.categories
            .insert((category.owner_id, category.id), category.clone());
        self.owners.insert(category.owner_id);
        Ok(())
    }

    async fn save_tag(&self, tag: &Tag) -> Result<()> {
        self.tags.insert((tag.owner_id, tag.id), tag.clone());
        self.owners.insert(tag.owner_id);
        Ok(())
    }

    async fn categories_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|entry| entry.key().0 == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        categories.sort_by_key(|c| c.id);
        Ok(categories)
    }

    async fn tags_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .tags
            .iter()
            .filter(|entry| entry.key().0 == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        tags.sort_by_key(|t| t.id);
        Ok(tags)
    }
}
