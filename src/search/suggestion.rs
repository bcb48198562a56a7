//! Remediation hints for empty result pages

use crate::search::criteria::SearchCriteria;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Spelling,
    BroaderSearch,
    ClearFilters,
    ReduceFilters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    /// Active filter names, only for [`SuggestionKind::ReduceFilters`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<String>>,
}

impl Suggestion {
    fn new(kind: SuggestionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            filters: None,
        }
    }
}

/// Suggestions derived purely from which criteria were active. Relaxed
/// queries are never re-run to check that a suggestion would help.
pub fn generate_suggestions(criteria: &SearchCriteria) -> Vec<Suggestion> {
    let active = criteria.active_filters();
    let mut suggestions = Vec::new();

    if let Some(text) = criteria.text() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Spelling,
            format!("Check the spelling of \"{}\"", text),
        ));
        suggestions.push(Suggestion::new(
            SuggestionKind::BroaderSearch,
            "Try a shorter or more general search term",
        ));
    }

    if !active.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::ClearFilters,
            "Clear all filters to see every todo",
        ));
    }

    if active.len() > 1 {
        let names: Vec<String> = active.iter().map(|kind| kind.as_str().to_string()).collect();
        suggestions.push(Suggestion {
            kind: SuggestionKind::ReduceFilters,
            message: format!("Try removing one of these filters: {}", names.join(", ")),
            filters: Some(names),
        });
    }

    suggestions
}

/// Convenience lookup used by callers rendering a single hint type
pub fn find_kind(suggestions: &[Suggestion], kind: SuggestionKind) -> Option<&Suggestion> {
    suggestions.iter().find(|s| s.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TodoPriority, TodoStatus};
    use crate::search::criteria::TagMode;

    fn kinds(suggestions: &[Suggestion]) -> Vec<SuggestionKind> {
        suggestions.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_no_filters_no_suggestions() {
        assert!(generate_suggestions(&SearchCriteria::default()).is_empty());
    }

    #[test]
    fn test_text_only() {
        let criteria = SearchCriteria::default().with_text("zzzznotfound");
        let suggestions = generate_suggestions(&criteria);

        assert_eq!(
            kinds(&suggestions),
            vec![
                SuggestionKind::Spelling,
                SuggestionKind::BroaderSearch,
                SuggestionKind::ClearFilters
            ]
        );
        assert!(find_kind(&suggestions, SuggestionKind::ReduceFilters).is_none());
    }

    #[test]
    fn test_single_non_text_filter() {
        let criteria = SearchCriteria::default().with_statuses([TodoStatus::Completed]);
        assert_eq!(kinds(&generate_suggestions(&criteria)), vec![SuggestionKind::ClearFilters]);
    }

    #[test]
    fn test_reduce_filters_lists_active_categories() {
        let criteria = SearchCriteria::default()
            .with_text("test")
            .with_statuses([TodoStatus::Pending])
            .with_priorities([TodoPriority::High])
            .with_categories([5], false)
            .with_tags([9], TagMode::Any);

        let suggestions = generate_suggestions(&criteria);
        let reduce = find_kind(&suggestions, SuggestionKind::ReduceFilters).unwrap();

        assert_eq!(
            reduce.filters.as_deref().unwrap(),
            ["search", "status", "priority", "category_id", "tag_ids"]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let criteria = SearchCriteria::default().with_text("x");
        let json = serde_json::to_value(generate_suggestions(&criteria)).unwrap();

        assert_eq!(json[0]["type"], "spelling");
        assert!(json[0].get("filters").is_none());
    }
}
