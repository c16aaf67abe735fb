//! The "add todo" form.

use chrono::NaiveDateTime;

use crate::error::ApiError;
use crate::types::{Category, NewTodo, Priority};

/// Formats accepted for the due date field, `datetime-local` first.
const DUE_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub task: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: String,
    pub tags: String,
}

impl TodoForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builds the create payload.
    ///
    /// Returns `Ok(None)` when the task is blank, since that submission is
    /// silently ignored. Blank optional fields are sent as absent.
    pub fn to_new_todo(&self) -> Result<Option<NewTodo>, ApiError> {
        let task = self.task.trim();
        if task.is_empty() {
            return Ok(None);
        }
        Ok(Some(NewTodo {
            task: task.to_string(),
            description: non_blank(&self.description),
            priority: self.priority,
            category: self.category,
            due_date: parse_due_date(&self.due_date)?,
            tags: non_blank(&self.tags),
            completed: false,
        }))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_due_date(raw: &str) -> Result<Option<NaiveDateTime>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    DUE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(Some)
        .ok_or_else(|| ApiError::InvalidInput(format!("unrecognised due date {raw:?}")))
}
