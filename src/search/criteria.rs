//! Criteria parsing: loosely-typed request parameters into a typed [`SearchCriteria`]
//!
//! Parsing never fails. Values outside an allow-list, malformed numbers and
//! unparsable dates are dropped and recorded as [`FilterWarning`]s; a filter
//! whose values were all dropped is simply inactive.

use crate::models::{CategoryId, TagId, TodoPriority, TodoStatus};
use crate::search::config::SearchConfig;
use crate::search::sort::{SortDirection, SortField};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Text query synonyms, in precedence order
pub const TEXT_PARAMS: [&str; 3] = ["q", "query", "search"];

const STATUS_PARAMS: [&str; 2] = ["status", "statuses"];
const PRIORITY_PARAMS: [&str; 2] = ["priority", "priorities"];
const CATEGORY_PARAMS: [&str; 2] = ["category_id", "category_ids"];
const TAG_PARAMS: [&str; 2] = ["tag_ids", "tag_id"];
const SORT_FIELD_PARAMS: [&str; 3] = ["sort_by", "sort_field", "sort"];
const SORT_DIRECTION_PARAMS: [&str; 3] = ["sort_order", "sort_direction", "direction"];
const PER_PAGE_PARAMS: [&str; 2] = ["per_page", "limit"];

/// Category values meaning "no category assigned"
const UNCATEGORIZED_SENTINELS: [&str; 3] = ["none", "null", "uncategorized"];

/// Raw request parameters: each key maps to a scalar, an array or null
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParams(BTreeMap<String, Value>);

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Fold URL query pairs. `key[]` is treated as `key`; repeated keys become arrays.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = BTreeMap::new();

        for (key, value) in pairs {
            let key = key.as_ref().trim_end_matches("[]").to_string();
            let value = Value::String(value.into());

            match params.remove(&key) {
                None => {
                    params.insert(key, value);
                }
                Some(Value::Array(mut values)) => {
                    values.push(value);
                    params.insert(key, Value::Array(values));
                }
                Some(existing) => {
                    params.insert(key, Value::Array(vec![existing, value]));
                }
            }
        }

        Self(params)
    }

    pub fn from_json(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First present key among `keys`
    fn first_of(&self, keys: &[&'static str]) -> Option<(&'static str, &Value)> {
        keys.iter()
            .find_map(|key| self.0.get(*key).map(|value| (*key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Filter categories, in canonical reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Search,
    Status,
    Priority,
    CategoryId,
    TagIds,
    DateRange,
}

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Search,
        FilterKind::Status,
        FilterKind::Priority,
        FilterKind::CategoryId,
        FilterKind::TagIds,
        FilterKind::DateRange,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::CategoryId => "category_id",
            Self::TagIds => "tag_ids",
            Self::DateRange => "date_range",
        }
    }
}

/// How multiple requested tags combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMode {
    /// At least one requested tag
    #[default]
    Any,
    /// Every requested tag
    All,
}

/// Category membership filter; the sentinel adds "no category" to the id set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub ids: BTreeSet<CategoryId>,
    pub include_uncategorized: bool,
}

impl CategoryFilter {
    pub fn matches(&self, category_id: Option<CategoryId>) -> bool {
        match category_id {
            Some(id) => self.ids.contains(&id),
            None => self.include_uncategorized,
        }
    }

    fn is_empty(&self) -> bool {
        self.ids.is_empty() && !self.include_uncategorized
    }
}

/// A request value that was dropped during parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterWarning {
    pub parameter: String,
    pub value: String,
    pub reason: String,
}

impl FilterWarning {
    fn new(parameter: &str, value: &Value, reason: impl Into<String>) -> Self {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Self {
            parameter: parameter.to_string(),
            value,
            reason: reason.into(),
        }
    }
}

/// Fully-typed search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    /// Trimmed, non-blank text query
    pub text: Option<String>,
    /// Which synonym supplied `text`
    pub text_param: Option<&'static str>,
    pub category_ids: Option<CategoryFilter>,
    pub statuses: Option<BTreeSet<TodoStatus>>,
    pub priorities: Option<BTreeSet<TodoPriority>>,
    pub tag_ids: Option<BTreeSet<TagId>>,
    pub tag_mode: TagMode,
    pub due_date_from: Option<NaiveDate>,
    pub due_date_to: Option<NaiveDate>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub per_page: u32,
    pub warnings: Vec<FilterWarning>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            text: None,
            text_param: None,
            category_ids: None,
            statuses: None,
            priorities: None,
            tag_ids: None,
            tag_mode: TagMode::Any,
            due_date_from: None,
            due_date_to: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            per_page: SearchConfig::default().per_page_default(),
            warnings: Vec::new(),
        }
    }
}

impl SearchCriteria {
    /// Parse raw parameters. Never fails; see module docs.
    pub fn from_params(params: &RawParams, config: &SearchConfig) -> Self {
        let mut parser = Parser {
            params,
            warnings: Vec::new(),
        };

        let (text, text_param) = parser.text();
        let category_ids = parser.categories();
        let statuses = parser.enum_set::<TodoStatus>(&STATUS_PARAMS);
        let priorities = parser.enum_set::<TodoPriority>(&PRIORITY_PARAMS);
        let tag_ids = parser.tags();
        let tag_mode = parser.tag_mode();
        let due_date_from = parser.date("due_date_from");
        let due_date_to = parser.date("due_date_to");
        let sort_field = parser.keyword(&SORT_FIELD_PARAMS).unwrap_or_default();
        let sort_direction = parser.keyword(&SORT_DIRECTION_PARAMS).unwrap_or_default();
        let page = parser.page();
        let per_page = parser.per_page(config);

        Self {
            text,
            text_param,
            category_ids,
            statuses,
            priorities,
            tag_ids,
            tag_mode,
            due_date_from,
            due_date_to,
            sort_field,
            sort_direction,
            page,
            per_page,
            warnings: parser.warnings,
        }
    }

    /// Text query, if one was honored
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_active(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Search => self.text.is_some(),
            FilterKind::Status => self.statuses.is_some(),
            FilterKind::Priority => self.priorities.is_some(),
            FilterKind::CategoryId => self.category_ids.is_some(),
            FilterKind::TagIds => self.tag_ids.is_some(),
            FilterKind::DateRange => self.due_date_from.is_some() || self.due_date_to.is_some(),
        }
    }

    /// Active filter categories in canonical order
    pub fn active_filters(&self) -> Vec<FilterKind> {
        FilterKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.text_param = self.text.as_ref().map(|_| TEXT_PARAMS[0]);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TodoStatus>) -> Self {
        self.statuses = non_empty(statuses.into_iter().collect());
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = TodoPriority>) -> Self {
        self.priorities = non_empty(priorities.into_iter().collect());
        self
    }

    pub fn with_categories(mut self, ids: impl IntoIterator<Item = CategoryId>, include_uncategorized: bool) -> Self {
        let filter = CategoryFilter {
            ids: ids.into_iter().collect(),
            include_uncategorized,
        };
        self.category_ids = (!filter.is_empty()).then_some(filter);
        self
    }

    pub fn with_tags(mut self, ids: impl IntoIterator<Item = TagId>, mode: TagMode) -> Self {
        self.tag_ids = non_empty(ids.into_iter().collect());
        self.tag_mode = mode;
        self
    }

    pub fn with_due_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.due_date_from = from;
        self.due_date_to = to;
        self
    }

    pub fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page.max(1);
        self.per_page = per_page;
        self
    }
}

fn non_empty<T>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    (!set.is_empty()).then_some(set)
}

struct Parser<'a> {
    params: &'a RawParams,
    warnings: Vec<FilterWarning>,
}

impl Parser<'_> {
    fn warn(&mut self, parameter: &str, value: &Value, reason: impl Into<String>) {
        self.warnings.push(FilterWarning::new(parameter, value, reason));
    }

    fn text(&mut self) -> (Option<String>, Option<&'static str>) {
        for key in TEXT_PARAMS {
            let Some(value) = self.params.get(key) else {
                continue;
            };

            let text = values_of(value)
                .into_iter()
                .filter_map(scalar_text)
                .map(|s| s.trim().to_string())
                .find(|s| !s.is_empty());

            if let Some(text) = text {
                return (Some(text), Some(key));
            }
        }

        (None, None)
    }

    fn enum_set<T>(&mut self, keys: &[&'static str]) -> Option<BTreeSet<T>>
    where
        T: FromStr + Ord,
    {
        let (key, value) = self.params.first_of(keys)?;
        let mut set = BTreeSet::new();

        for item in values_of(value) {
            match scalar_text(item).filter(|s| !s.trim().is_empty()) {
                Some(text) => match T::from_str(text.trim()) {
                    Ok(parsed) => {
                        set.insert(parsed);
                    }
                    Err(_) => self.warn(key, item, "unknown value"),
                },
                None if item.is_null() || is_blank(item) => {}
                None => self.warn(key, item, "expected a string"),
            }
        }

        non_empty(set)
    }

    fn categories(&mut self) -> Option<CategoryFilter> {
        let (key, value) = self.params.first_of(&CATEGORY_PARAMS)?;
        let mut filter = CategoryFilter::default();

        for item in values_of(value) {
            if item.is_null() {
                filter.include_uncategorized = true;
                continue;
            }
            if let Some(text) = scalar_text(item) {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if UNCATEGORIZED_SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(text)) {
                    filter.include_uncategorized = true;
                    continue;
                }
            }
            match integer(item) {
                Some(id) => {
                    filter.ids.insert(id);
                }
                None => self.warn(key, item, "expected a category id"),
            }
        }

        (!filter.is_empty()).then_some(filter)
    }

    fn tags(&mut self) -> Option<BTreeSet<TagId>> {
        let (key, value) = self.params.first_of(&TAG_PARAMS)?;
        let mut ids = BTreeSet::new();

        for item in values_of(value) {
            if item.is_null() || is_blank(item) {
                continue;
            }
            match integer(item) {
                Some(id) => {
                    ids.insert(id);
                }
                None => self.warn(key, item, "expected a tag id"),
            }
        }

        non_empty(ids)
    }

    fn tag_mode(&mut self) -> TagMode {
        let Some(value) = self.params.get("tag_mode") else {
            return TagMode::Any;
        };

        match scalar_text(value).map(|s| s.trim().to_ascii_lowercase()) {
            Some(mode) if mode == "all" => TagMode::All,
            Some(mode) if mode == "any" || mode.is_empty() => TagMode::Any,
            _ => {
                self.warn("tag_mode", value, "expected any or all");
                TagMode::Any
            }
        }
    }

    fn date(&mut self, key: &'static str) -> Option<NaiveDate> {
        let value = self.params.get(key)?;
        let text = scalar_text(value)?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()));

        if parsed.is_none() {
            self.warn(key, value, "expected a YYYY-MM-DD date");
        }
        parsed
    }

    fn keyword<T>(&mut self, keys: &[&'static str]) -> Option<T>
    where
        T: FromStr,
    {
        let (key, value) = self.params.first_of(keys)?;
        let text = scalar_text(value)?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let parsed = T::from_str(text).ok();
        if parsed.is_none() {
            self.warn(key, value, "not an allowed value");
        }
        parsed
    }

    fn page(&mut self) -> u32 {
        let Some(value) = self.params.get("page") else {
            return 1;
        };

        match count(value) {
            Some(page) => page.clamp(1, i64::from(u32::MAX)) as u32,
            None => {
                if !is_blank(value) {
                    self.warn("page", value, "expected an integer");
                }
                1
            }
        }
    }

    fn per_page(&mut self, config: &SearchConfig) -> u32 {
        let limit = config.per_page_limit();
        let Some((key, value)) = self.params.first_of(&PER_PAGE_PARAMS) else {
            return config.per_page_default();
        };

        match count(value) {
            Some(per_page) => per_page.clamp(1, i64::from(limit)) as u32,
            None => {
                if !is_blank(value) {
                    self.warn(key, value, "expected an integer");
                }
                config.per_page_default()
            }
        }
    }
}

/// Normalize a scalar-or-array value into a list of items
fn values_of(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Textual form of a scalar; arrays and objects have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(scalar_text),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(integer),
        _ => None,
    }
}

/// Numeric value saturated into `i64`, for parameters that get clamped.
/// Out-of-range integers and finite floats saturate; `as` truncates toward zero.
fn count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        Value::Array(items) => items.first().and_then(count),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        _ => false,
    }
}
