use crate::api::{AppState, AuthenticatedOwner};
use crate::error::Result;
use crate::models::{CategoryId, OwnerId, TagId, Todo, TodoId, TodoPriority, TodoStatus};
use crate::search::{RawParams, SearchResult};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        highlighting: state.search.config().enable_highlighting,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub highlighting: bool,
}

/// Search the caller's todos from URL query parameters.
///
/// Repeated keys and `key[]` forms are folded into arrays.
pub async fn search_todos(
    State(state): State<AppState>,
    AuthenticatedOwner(owner_id): AuthenticatedOwner,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResult>> {
    let params = RawParams::from_pairs(pairs);
    let result = state.search.search(owner_id, &params).await?;
    Ok(Json(result))
}

/// Search the caller's todos from a JSON object body
pub async fn search_todos_json(
    State(state): State<AppState>,
    AuthenticatedOwner(owner_id): AuthenticatedOwner,
    Json(params): Json<RawParams>,
) -> Result<Json<SearchResult>> {
    let result = state.search.search(owner_id, &params).await?;
    Ok(Json(result))
}

/// Create a todo owned by the caller
pub async fn create_todo(
    State(state): State<AppState>,
    AuthenticatedOwner(owner_id): AuthenticatedOwner,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    request.validate()?;

    let id = state.store.next_todo_id().await?;
    let todo = request.into_todo(id, owner_id);
    todo.validate()?;

    state.store.save_todo(&todo).await?;
    tracing::info!(owner_id, todo_id = id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: TodoPriority,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub position: i32,
}

impl CreateTodoRequest {
    fn into_todo(self, id: TodoId, owner_id: OwnerId) -> Todo {
        let mut todo = Todo::new(id, owner_id, self.title)
            .with_status(self.status)
            .with_priority(self.priority)
            .with_tags(self.tag_ids)
            .with_position(self.position);

        todo.description = self.description;
        todo.due_date = self.due_date;
        todo.category_id = self.category_id;
        todo
    }
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> (StatusCode, String) {
    let metrics = crate::metrics::gather_metrics();
    (StatusCode::OK, metrics)
}
