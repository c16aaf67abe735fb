//! Render model for the board.
//!
//! Hosts turn a [`BoardView`] into markup; every class name the stylesheet
//! keys on is decided here so the look of a row can be tested without a DOM.

use chrono::NaiveDateTime;
use strum::IntoEnumIterator;

use crate::client::TodoClient;
use crate::drag::DragState;
use crate::types::{Category, Priority, Statistics, Todo, TodoId};

const DUE_DATE_DISPLAY: &str = "%b %-d, %Y %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub theme_class: &'static str,
    pub filters_open: bool,
    pub rows: Vec<TodoRow>,
    pub counts: Counts,
    pub can_clear_completed: bool,
    pub statistics: Option<StatisticsView>,
}

/// Counts over the rows currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: TodoId,
    pub task: String,
    pub description: Option<String>,
    pub priority: &'static str,
    pub category: &'static str,
    pub due: Option<String>,
    pub overdue: bool,
    pub tags: Vec<String>,
    pub completed: bool,
    pub class: String,
}

impl TodoRow {
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsView {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
    /// Whole percent of completed todos, 0 when there are none.
    pub completion_percent: u64,
    pub by_priority: Vec<(&'static str, u64)>,
    pub by_category: Vec<(&'static str, u64)>,
}

impl StatisticsView {
    pub fn new(stats: &Statistics) -> Self {
        let completion_percent = if stats.total == 0 {
            0
        } else {
            stats.completed * 100 / stats.total
        };
        Self {
            total: stats.total,
            completed: stats.completed,
            pending: stats.pending,
            overdue: stats.overdue,
            completion_percent,
            by_priority: Priority::iter()
                .map(|p| (p.label(), stats.by_priority.get(&p).copied().unwrap_or(0)))
                .collect(),
            by_category: Category::iter()
                .map(|c| (c.label(), stats.by_category.get(&c).copied().unwrap_or(0)))
                .collect(),
        }
    }
}

impl TodoClient {
    /// Snapshot of everything the host needs to draw. `now` decides which
    /// rows are overdue.
    pub fn view(&self, now: NaiveDateTime) -> BoardView {
        let rows: Vec<TodoRow> = self
            .todos()
            .iter()
            .map(|todo| row(todo, self.drag(), now))
            .collect();
        let completed = rows.iter().filter(|row| row.completed).count();
        let statistics = self
            .statistics()
            .filter(|_| self.is_statistics_open())
            .map(StatisticsView::new);
        BoardView {
            theme_class: if self.is_dark_mode() { "theme-dark" } else { "theme-light" },
            filters_open: self.is_filters_open(),
            counts: Counts {
                total: rows.len(),
                completed,
                pending: rows.len() - completed,
            },
            can_clear_completed: completed > 0,
            rows,
            statistics,
        }
    }
}

fn row(todo: &Todo, drag: &DragState, now: NaiveDateTime) -> TodoRow {
    let overdue = todo.is_overdue(now);
    let mut class = vec!["todo-item".to_string()];
    if todo.completed {
        class.push("completed".to_string());
    }
    class.push(format!("priority-{}", todo.priority.to_string().to_lowercase()));
    if overdue {
        class.push("overdue".to_string());
    }
    let dragging = drag.dragging.as_ref() == Some(&todo.id);
    if dragging {
        class.push("dragging".to_string());
    }
    if drag.over.as_ref() == Some(&todo.id) && !dragging {
        class.push("drag-over".to_string());
    }

    TodoRow {
        id: todo.id.clone(),
        task: todo.task.clone(),
        description: todo.description.clone().filter(|d| !d.trim().is_empty()),
        priority: todo.priority.label(),
        category: todo.category.label(),
        due: todo.due_date.map(|due| due.format(DUE_DATE_DISPLAY).to_string()),
        overdue,
        tags: todo.tag_list(),
        completed: todo.completed,
        class: class.join(" "),
    }
}
