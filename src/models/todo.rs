use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use validator::Validate;

/// Identifier of a todo (unique per store, not per owner)
pub type TodoId = i64;

/// Identifier of the user owning todos, categories and tags
pub type OwnerId = i64;

/// Identifier of a category
pub type CategoryId = i64;

/// Identifier of a tag
pub type TagId = i64;

/// A single todo item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,

    /// Owning user
    pub owner_id: OwnerId,

    /// Human-readable title
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Workflow status
    #[serde(default)]
    pub status: TodoStatus,

    /// Priority level
    #[serde(default)]
    pub priority: TodoPriority,

    /// Optional calendar due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Assigned category, if any
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Assigned tags
    #[serde(default)]
    pub tag_ids: BTreeSet<TagId>,

    /// Manual ordering position
    #[serde(default)]
    pub position: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a pending, medium-priority todo with no optional attributes
    pub fn new(id: TodoId, owner_id: OwnerId, title: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            owner_id,
            title: title.into(),
            description: None,
            status: TodoStatus::default(),
            priority: TodoPriority::default(),
            due_date: None,
            category_id: None,
            tag_ids: BTreeSet::new(),
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TodoPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Check if the todo is done
    pub fn is_completed(&self) -> bool {
        self.status == TodoStatus::Completed
    }
}

/// Workflow status. Variant order is the sort rank.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Priority level. Variant order is the sort rank.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_todo_creation() {
        let todo = Todo::new(1, 42, "Write report");

        assert_eq!(todo.owner_id, 42);
        assert_eq!(todo.status, TodoStatus::Pending);
        assert_eq!(todo.priority, TodoPriority::Medium);
        assert!(todo.tag_ids.is_empty());
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let todo = Todo::new(1, 42, "");
        assert!(todo.validate().is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(TodoStatus::from_str("in_progress").unwrap(), TodoStatus::InProgress);
        assert_eq!(TodoStatus::from_str("Completed").unwrap(), TodoStatus::Completed);
        assert!(TodoStatus::from_str("compelted").is_err());
        assert_eq!(TodoStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_rank_order() {
        assert!(TodoPriority::Low < TodoPriority::Medium);
        assert!(TodoPriority::Medium < TodoPriority::High);
        assert!(TodoStatus::Pending < TodoStatus::Completed);
    }
}
