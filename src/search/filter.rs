//! Filter pipeline: ownership scope, then every active filter category
//!
//! Categories combine with AND; values within a category combine with OR,
//! except tags in [`TagMode::All`]. Each todo is evaluated exactly once, so a
//! todo can never appear twice in the output.

use crate::models::{OwnerId, TagId, Todo};
use crate::search::criteria::{SearchCriteria, TagMode};
use crate::search::highlight::contains_ignore_case;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Reduce `todos` to those owned by `owner_id` and passing every active filter
pub fn apply_filters(owner_id: OwnerId, todos: Vec<Todo>, criteria: &SearchCriteria) -> Vec<Todo> {
    todos
        .into_iter()
        .filter(|todo| todo.owner_id == owner_id)
        .filter(|todo| matches_criteria(todo, criteria))
        .collect()
}

/// Whether one todo passes every active filter. Ownership is not checked here.
pub fn matches_criteria(todo: &Todo, criteria: &SearchCriteria) -> bool {
    matches_text(todo, criteria.text())
        && criteria
            .category_ids
            .as_ref()
            .map_or(true, |filter| filter.matches(todo.category_id))
        && criteria
            .statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&todo.status))
        && criteria
            .priorities
            .as_ref()
            .map_or(true, |priorities| priorities.contains(&todo.priority))
        && criteria
            .tag_ids
            .as_ref()
            .map_or(true, |requested| matches_tags(&todo.tag_ids, requested, criteria.tag_mode))
        && matches_due_range(todo.due_date, criteria.due_date_from, criteria.due_date_to)
}

fn matches_text(todo: &Todo, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };

    contains_ignore_case(&todo.title, query)
        || todo
            .description
            .as_deref()
            .is_some_and(|description| contains_ignore_case(description, query))
}

/// Any: at least one requested tag is assigned. All: the number of assigned
/// tags found in the request equals the request size.
pub fn matches_tags(assigned: &BTreeSet<TagId>, requested: &BTreeSet<TagId>, mode: TagMode) -> bool {
    let matched = assigned.iter().filter(|id| requested.contains(id)).count();

    match mode {
        TagMode::Any => matched > 0,
        TagMode::All => matched == requested.len(),
    }
}

/// Inclusive range check. With no bounds every todo passes; with any bound a
/// todo lacking a due date fails.
pub fn matches_due_range(due_date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }

    let Some(due) = due_date else {
        return false;
    };

    from.map_or(true, |from| due >= from) && to.map_or(true, |to| due <= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TodoPriority, TodoStatus};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn sample() -> Vec<Todo> {
        vec![
            Todo::new(1, 1, "Write quarterly report")
                .with_status(TodoStatus::InProgress)
                .with_priority(TodoPriority::High)
                .with_category(10)
                .with_tags([100, 101, 102])
                .with_due_date(date(3, 15)),
            Todo::new(2, 1, "Groceries")
                .with_description("milk, eggs, REPORT card envelope")
                .with_tags([100]),
            Todo::new(3, 1, "Call plumber").with_category(11).with_due_date(date(4, 1)),
            Todo::new(4, 2, "Other owner's report").with_category(10).with_tags([100, 101]),
        ]
    }

    fn ids(todos: &[Todo]) -> Vec<i64> {
        todos.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_ownership_applied_without_filters() {
        let result = apply_filters(1, sample(), &SearchCriteria::default());
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_text_matches_title_or_description() {
        let criteria = SearchCriteria::default().with_text("report");
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_category_sentinel_mixed_with_ids() {
        let criteria = SearchCriteria::default().with_categories([11], true);
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn test_foreign_category_id_matches_nothing() {
        let criteria = SearchCriteria::default().with_categories([99], false);
        assert!(apply_filters(1, sample(), &criteria).is_empty());
    }

    #[test]
    fn test_status_and_priority() {
        let criteria = SearchCriteria::default()
            .with_statuses([TodoStatus::Pending, TodoStatus::InProgress])
            .with_priorities([TodoPriority::High]);
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_tag_all_mode_superset() {
        let assigned = BTreeSet::from([1, 2, 3]);

        assert!(matches_tags(&assigned, &BTreeSet::from([1, 2]), TagMode::All));
        assert!(!matches_tags(&assigned, &BTreeSet::from([1, 4]), TagMode::All));
        assert!(matches_tags(&assigned, &BTreeSet::from([1, 4]), TagMode::Any));
        assert!(!matches_tags(&BTreeSet::new(), &BTreeSet::from([1]), TagMode::Any));
    }

    #[test]
    fn test_tag_all_mode_yields_each_todo_once() {
        let criteria = SearchCriteria::default().with_tags([100, 101], TagMode::All);
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![1]);

        let criteria = SearchCriteria::default().with_tags([100, 101], TagMode::Any);
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_due_range() {
        assert!(matches_due_range(None, None, None));
        assert!(!matches_due_range(None, Some(date(1, 1)), None));
        assert!(!matches_due_range(None, None, Some(date(12, 31))));
        assert!(matches_due_range(Some(date(3, 15)), Some(date(3, 15)), Some(date(3, 15))));
        assert!(!matches_due_range(Some(date(3, 16)), None, Some(date(3, 15))));
        assert!(!matches_due_range(Some(date(3, 15)), Some(date(4, 1)), Some(date(3, 1))));
    }

    #[test]
    fn test_date_filter_excludes_undated() {
        let criteria = SearchCriteria::default().with_due_range(Some(date(3, 1)), None);
        let result = apply_filters(1, sample(), &criteria);
        assert_eq!(ids(&result), vec![1, 3]);
    }
}
