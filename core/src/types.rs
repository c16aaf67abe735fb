//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's JSON schema (camelCase fields, enum values
//! in SCREAMING_SNAKE_CASE, timestamps as zone-less ISO-8601) but are defined
//! independently of the mock-server crate. Integration tests catch any schema
//! drift between the two.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Education,
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

/// Server-assigned identifier, opaque to the client.
///
/// The backend issues integer ids; string ids from other deployments are
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Int(i64),
    Text(String),
}

impl TodoId {
    /// The id as a single URL path segment.
    pub fn path_segment(&self) -> String {
        match self {
            TodoId::Int(n) => n.to_string(),
            TodoId::Text(s) => utf8_percent_encode(s, NON_ALPHANUMERIC).to_string(),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Int(n) => write!(f, "{n}"),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        TodoId::Int(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        TodoId::Text(id)
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub task: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub tags: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub display_order: i32,
}

impl Todo {
    /// Tags split out of the comma-separated `tags` field.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(parse_tags).unwrap_or_default()
    }

    /// Open and past its due date.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Split a comma-separated tag string, trimming whitespace and dropping
/// empty pieces.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for replacing the editable fields of an existing todo.
/// Every field is sent; `None` clears the value on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub task: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Option<String>,
    pub display_order: i32,
}

impl From<&Todo> for UpdateTodo {
    fn from(todo: &Todo) -> Self {
        Self {
            task: todo.task.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            priority: todo.priority,
            category: todo.category,
            due_date: todo.due_date,
            tags: todo.tags.clone(),
            display_order: todo.display_order,
        }
    }
}

/// One element of the reorder body; position in the array is the new order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderEntry {
    pub id: TodoId,
}

/// Query narrowing the list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub search: String,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
}

impl TodoFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query string without the leading `?`, or `None` when nothing is set.
    ///
    /// Parameters appear in the order search, priority, category, completed.
    pub fn query_string(&self) -> Option<String> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if !self.search.trim().is_empty() {
            pairs.push(("search", utf8_percent_encode(&self.search, NON_ALPHANUMERIC).to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        if pairs.is_empty() {
            return None;
        }
        Some(
            pairs
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&"),
        )
    }
}

/// Aggregate counts computed by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
    #[serde(default)]
    pub by_priority: BTreeMap<Priority, u64>,
    #[serde(default)]
    pub by_category: BTreeMap<Category, u64>,
}
