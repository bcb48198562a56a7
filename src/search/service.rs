//! Search orchestrator: parse, scope, filter, sort, paginate, annotate

use crate::metrics::{
    SEARCH_DURATION_SECONDS, SEARCH_FILTERS_APPLIED_TOTAL, SEARCH_MATCHED_TODOS,
    SEARCH_REQUESTS_TOTAL, SEARCH_VALUES_DROPPED_TOTAL,
};
use crate::models::{OwnerId, Todo};
use crate::search::config::SearchConfig;
use crate::search::criteria::{FilterKind, FilterWarning, RawParams, SearchCriteria};
use crate::search::error::{Result, SearchError};
use crate::search::filter::apply_filters;
use crate::search::highlight::{highlight_todo, Highlight};
use crate::search::pagination::{paginate, Pagination};
use crate::search::sort::{sort_todos, SortDirection, SortField};
use crate::search::suggestion::{generate_suggestions, Suggestion};
use crate::state::TodoStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One returned todo with its match spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub todo: Todo,
    pub highlights: Vec<Highlight>,
}

/// Which filter categories were honored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersApplied {
    pub search: bool,
    pub status: bool,
    pub priority: bool,
    pub category_id: bool,
    pub tag_ids: bool,
    pub date_range: bool,
}

impl FiltersApplied {
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        Self {
            search: criteria.is_active(FilterKind::Search),
            status: criteria.is_active(FilterKind::Status),
            priority: criteria.is_active(FilterKind::Priority),
            category_id: criteria.is_active(FilterKind::CategoryId),
            tag_ids: criteria.is_active(FilterKind::TagIds),
            date_range: criteria.is_active(FilterKind::DateRange),
        }
    }

    /// Names of the honored categories, in canonical order
    pub fn names(&self) -> Vec<&'static str> {
        let flags = [
            (FilterKind::Search, self.search),
            (FilterKind::Status, self.status),
            (FilterKind::Priority, self.priority),
            (FilterKind::CategoryId, self.category_id),
            (FilterKind::TagIds, self.tag_ids),
            (FilterKind::DateRange, self.date_range),
        ];

        flags
            .into_iter()
            .filter(|(_, active)| *active)
            .map(|(kind, _)| kind.as_str())
            .collect()
    }

    pub fn any(&self) -> bool {
        !self.names().is_empty()
    }
}

/// Page metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub total_count: usize,
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    /// The honored text query, whichever synonym supplied it
    pub search_query: Option<String>,
    pub filters_applied: FiltersApplied,
    pub sort_by: SortField,
    pub sort_order: SortDirection,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Search response: one page of hits plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub data: Vec<SearchHit>,
    pub meta: SearchMetadata,
    /// Present only when `data` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    /// Dropped request values, when invalid-filter reporting is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FilterWarning>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn todos(&self) -> impl Iterator<Item = &Todo> {
        self.data.iter().map(|hit| &hit.todo)
    }
}

/// Main search service
pub struct SearchService {
    store: Arc<dyn TodoStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn TodoStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search `owner_id`'s todos with loosely-typed request parameters
    pub async fn search(&self, owner_id: OwnerId, params: &RawParams) -> Result<SearchResult> {
        let criteria = SearchCriteria::from_params(params, &self.config);
        self.search_criteria(owner_id, criteria).await
    }

    /// Search with already-typed criteria
    pub async fn search_criteria(&self, owner_id: OwnerId, criteria: SearchCriteria) -> Result<SearchResult> {
        let timer = SEARCH_DURATION_SECONDS.start_timer();

        let todos = match self.owner_todos(owner_id).await {
            Ok(todos) => todos,
            Err(e) => {
                SEARCH_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!(owner_id, error = %e, "Search failed resolving owner collection");
                return Err(e);
            }
        };

        let result = self.execute(owner_id, todos, criteria);
        timer.observe_duration();

        let outcome = if result.is_empty() { "empty" } else { "ok" };
        SEARCH_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();

        Ok(result)
    }

    /// Owner resolution is the only step allowed to fail
    async fn owner_todos(&self, owner_id: OwnerId) -> Result<Vec<Todo>> {
        if self.config.require_known_owner && !self.store.owner_exists(owner_id).await? {
            return Err(SearchError::OwnerNotFound(owner_id));
        }

        Ok(self.store.todos_for_owner(owner_id).await?)
    }

    /// Run the pipeline over an already-loaded collection. Rows owned by
    /// anyone but `owner_id` are discarded first.
    pub fn execute(&self, owner_id: OwnerId, todos: Vec<Todo>, criteria: SearchCriteria) -> SearchResult {
        let filters_applied = FiltersApplied::from_criteria(&criteria);
        for name in filters_applied.names() {
            SEARCH_FILTERS_APPLIED_TOTAL.with_label_values(&[name]).inc();
        }
        for warning in &criteria.warnings {
            SEARCH_VALUES_DROPPED_TOTAL
                .with_label_values(&[warning.parameter.as_str()])
                .inc();
        }
        if !criteria.warnings.is_empty() {
            tracing::debug!(owner_id, dropped = criteria.warnings.len(), "Ignored malformed filter values");
        }

        let mut matched = apply_filters(owner_id, todos, &criteria);
        sort_todos(&mut matched, criteria.sort_field, criteria.sort_direction);
        SEARCH_MATCHED_TODOS.observe(matched.len() as f64);

        let pagination = Pagination::new(matched.len(), criteria.page, criteria.per_page);
        let page = paginate(matched, &pagination);

        let query = criteria.text().filter(|_| self.config.enable_highlighting);
        let data: Vec<SearchHit> = page
            .into_iter()
            .map(|todo| {
                let highlights = query
                    .map(|q| highlight_todo(&todo, q, self.config.highlight_description))
                    .unwrap_or_default();
                SearchHit { todo, highlights }
            })
            .collect();

        let suggestions = data.is_empty().then(|| {
            if self.config.enable_suggestions {
                generate_suggestions(&criteria)
            } else {
                Vec::new()
            }
        });

        tracing::debug!(
            owner_id,
            total_count = pagination.total_count,
            page = pagination.current_page,
            per_page = pagination.per_page,
            returned = data.len(),
            filters = ?filters_applied.names(),
            "Search completed"
        );

        let warnings = if self.config.report_invalid_filters {
            criteria.warnings
        } else {
            Vec::new()
        };

        SearchResult {
            data,
            meta: SearchMetadata {
                total_count: pagination.total_count,
                current_page: pagination.current_page,
                total_pages: pagination.total_pages,
                per_page: pagination.per_page,
                search_query: criteria.text,
                filters_applied,
                sort_by: criteria.sort_field,
                sort_order: criteria.sort_direction,
                has_next_page: pagination.has_next(),
                has_previous_page: pagination.has_previous(),
            },
            suggestions,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoStatus;
    use crate::search::config::SearchConfigBuilder;
    use crate::state::InMemoryStore;
    use serde_json::json;

    async fn create_test_service(config: SearchConfig) -> SearchService {
        let store = InMemoryStore::new();
        let todos = vec![
            Todo::new(1, 1, "Learn Ruby on Rails").with_position(2),
            Todo::new(2, 1, "Buy groceries").with_position(1),
            Todo::new(3, 1, "Rails upgrade notes")
                .with_status(TodoStatus::Completed)
                .with_position(3),
            Todo::new(4, 2, "Rails for owner two"),
        ];
        for todo in &todos {
            store.save_todo(todo).await.unwrap();
        }

        SearchService::new(Arc::new(store), config)
    }

    #[tokio::test]
    async fn test_search_scoped_and_ordered() {
        let service = create_test_service(SearchConfig::default()).await;

        let result = service.search(1, &RawParams::new()).await.unwrap();
        let ids: Vec<i64> = result.todos().map(|t| t.id).collect();

        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(result.meta.total_count, 3);
        assert!(result.suggestions.is_none());
        assert!(!result.meta.filters_applied.any());
        assert!(!result.meta.has_next_page);
        assert!(!result.meta.has_previous_page);
    }

    #[tokio::test]
    async fn test_page_flags_follow_pagination() {
        let service = create_test_service(SearchConfig::default()).await;

        let first = service.search(1, &RawParams::new().with("per_page", 2)).await.unwrap();
        assert!(first.meta.has_next_page);
        assert!(!first.meta.has_previous_page);

        let params = RawParams::new().with("per_page", 2).with("page", 2);
        let last = service.search(1, &params).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.meta.has_next_page);
        assert!(last.meta.has_previous_page);
    }

    #[tokio::test]
    async fn test_search_echoes_honored_synonym() {
        let service = create_test_service(SearchConfig::default()).await;

        let params = RawParams::new().with("q", "").with("search", "rails");
        let result = service.search(1, &params).await.unwrap();

        assert_eq!(result.meta.search_query.as_deref(), Some("rails"));
        assert_eq!(result.meta.total_count, 2);
        assert!(result.data.iter().all(|hit| !hit.highlights.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_page_has_suggestions() {
        let service = create_test_service(SearchConfig::default()).await;

        let params = RawParams::new().with("q", "zzzznotfound");
        let result = service.search(1, &params).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.meta.total_pages, 1);
        assert_eq!(result.suggestions.map(|s| s.len()), Some(3));
    }

    #[tokio::test]
    async fn test_highlighting_disabled() {
        let config = SearchConfigBuilder::new().enable_highlighting(false).build();
        let service = create_test_service(config).await;

        let result = service.search(1, &RawParams::new().with("q", "rails")).await.unwrap();
        assert!(result.data.iter().all(|hit| hit.highlights.is_empty()));
    }

    #[tokio::test]
    async fn test_warnings_reported_only_when_enabled() {
        let params = RawParams::new().with("status", json!(["compelted"]));

        let lenient = create_test_service(SearchConfig::default()).await;
        let result = lenient.search(1, &params).await.unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.meta.total_count, 3);

        let strict = create_test_service(SearchConfigBuilder::new().report_invalid_filters(true).build()).await;
        let result = strict.search(1, &params).await.unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.meta.total_count, 3);
    }

    #[tokio::test]
    async fn test_unknown_owner() {
        let lenient = create_test_service(SearchConfig::default()).await;
        let result = lenient.search(99, &RawParams::new()).await.unwrap();
        assert_eq!(result.meta.total_count, 0);
        assert_eq!(result.suggestions, Some(vec![]));

        let strict = create_test_service(SearchConfigBuilder::new().require_known_owner(true).build()).await;
        let err = strict.search(99, &RawParams::new()).await.unwrap_err();
        assert!(matches!(err, SearchError::OwnerNotFound(99)));
    }

    #[test]
    fn test_execute_discards_foreign_rows() {
        let service = SearchService::new(Arc::new(InMemoryStore::new()), SearchConfig::default());
        let todos = vec![Todo::new(1, 1, "mine"), Todo::new(2, 2, "not mine")];

        let result = service.execute(1, todos, SearchCriteria::default());
        assert_eq!(result.meta.total_count, 1);
    }
}
