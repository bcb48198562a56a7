use crate::models::{CategoryId, OwnerId, TagId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user-defined grouping for todos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Category {
    pub id: CategoryId,
    pub owner_id: OwnerId,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// A free-form label; a todo can carry any number of tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Tag {
    pub id: TagId,
    pub owner_id: OwnerId,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
        }
    }
}

impl Tag {
    pub fn new(id: TagId, owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
        }
    }
}
