//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use todo_search::models::{Category, Tag, Todo, TodoPriority, TodoStatus};
use todo_search::search::{SearchConfig, SearchService};
use todo_search::state::{InMemoryStore, TodoStore};

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

/// Category and tag IDs deliberately shared by both owners' todos
pub const WORK: i64 = 10;
pub const HOME: i64 = 11;
pub const URGENT: i64 = 100;
pub const WEEKLY: i64 = 101;
pub const ERRAND: i64 = 102;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Alice owns todos 1-6, Bob owns 7-9. Bob's todos reuse Alice's category
/// and tag IDs and contain the same words.
pub fn sample_todos() -> Vec<Todo> {
    vec![
        Todo::new(1, ALICE, "Ruby on Rails学習")
            .with_description("Finish the Rails guide")
            .with_priority(TodoPriority::High)
            .with_category(WORK)
            .with_tags([URGENT, WEEKLY])
            .with_due_date(date(2024, 3, 10))
            .with_position(3),
        Todo::new(2, ALICE, "Buy groceries")
            .with_description("milk, eggs, bread")
            .with_priority(TodoPriority::Low)
            .with_category(HOME)
            .with_tags([ERRAND])
            .with_position(1),
        Todo::new(3, ALICE, "Write weekly report")
            .with_status(TodoStatus::InProgress)
            .with_category(WORK)
            .with_tags([WEEKLY])
            .with_due_date(date(2024, 3, 1))
            .with_position(2),
        Todo::new(4, ALICE, "Call the plumber")
            .with_status(TodoStatus::Completed)
            .with_priority(TodoPriority::High)
            .with_due_date(date(2024, 2, 20))
            .with_position(5),
        Todo::new(5, ALICE, "Plan vacation")
            .with_tags([URGENT, WEEKLY, ERRAND])
            .with_position(4),
        Todo::new(6, ALICE, "Renew passport")
            .with_status(TodoStatus::Completed)
            .with_category(HOME)
            .with_due_date(date(2024, 3, 10))
            .with_position(6),
        Todo::new(7, BOB, "Rails upgrade")
            .with_category(WORK)
            .with_tags([URGENT, WEEKLY])
            .with_due_date(date(2024, 3, 5)),
        Todo::new(8, BOB, "Weekly report for Bob")
            .with_category(WORK)
            .with_tags([WEEKLY]),
        Todo::new(9, BOB, "Buy groceries too").with_category(HOME),
    ]
}

pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    for todo in sample_todos() {
        store.save_todo(&todo).await.unwrap();
    }
    store.save_category(&Category::new(WORK, ALICE, "Work")).await.unwrap();
    store.save_category(&Category::new(HOME, ALICE, "Home")).await.unwrap();
    store.save_tag(&Tag::new(URGENT, ALICE, "urgent")).await.unwrap();
    store.save_tag(&Tag::new(WEEKLY, ALICE, "weekly")).await.unwrap();
    store.save_tag(&Tag::new(ERRAND, ALICE, "errand")).await.unwrap();

    store
}

pub async fn create_test_service(config: SearchConfig) -> SearchService {
    SearchService::new(seeded_store().await, config)
}

/// Alice's collection grown to `count` todos with descending positions
pub async fn bulk_service(count: i64) -> SearchService {
    let store = Arc::new(InMemoryStore::new());
    for id in 1..=count {
        let todo = Todo::new(id, ALICE, format!("Task {}", id)).with_position((count - id) as i32);
        store.save_todo(&todo).await.unwrap();
    }
    SearchService::new(store, SearchConfig::default())
}

/// Parse Prometheus exposition format into metric name -> lines
pub fn parse_prometheus_output(output: &str) -> HashMap<String, Vec<String>> {
    let mut metrics = HashMap::new();
    let mut current_metric = String::new();

    for line in output.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("# HELP") || line.starts_with("# TYPE") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                current_metric = parts[2].to_string();
                metrics.entry(current_metric.clone()).or_insert_with(Vec::new).push(line.to_string());
            }
        } else if !line.starts_with('#') && !current_metric.is_empty() {
            metrics.entry(current_metric.clone()).or_insert_with(Vec::new).push(line.to_string());
        }
    }

    metrics
}
