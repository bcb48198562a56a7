//! Deterministic ordering of filtered todos

use crate::models::Todo;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

/// Allow-listed sort keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Position,
    Title,
    DueDate,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    #[strum(serialize = "asc", serialize = "ascending")]
    Asc,
    #[strum(serialize = "desc", serialize = "descending")]
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Sort in place by `field`.
///
/// Only the primary key honors `direction`. A missing due date always sorts
/// after every present one, and ties fall back to ascending id so that page
/// boundaries are stable across identical requests.
pub fn sort_todos(todos: &mut [Todo], field: SortField, direction: SortDirection) {
    todos.sort_by(|a, b| compare(a, b, field, direction).then_with(|| a.id.cmp(&b.id)));
}

fn compare(a: &Todo, b: &Todo, field: SortField, direction: SortDirection) -> Ordering {
    match field {
        SortField::Position => direction.apply(a.position.cmp(&b.position)),
        SortField::Title => direction.apply(compare_titles(&a.title, &b.title)),
        SortField::Priority => direction.apply(a.priority.cmp(&b.priority)),
        SortField::Status => direction.apply(a.status.cmp(&b.status)),
        SortField::CreatedAt => direction.apply(a.created_at.cmp(&b.created_at)),
        SortField::UpdatedAt => direction.apply(a.updated_at.cmp(&b.updated_at)),
        SortField::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
