use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
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
    pub const ALL: [Category; 6] = [
        Category::Personal,
        Category::Work,
        Category::Shopping,
        Category::Health,
        Category::Education,
        Category::Other,
    ];
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub task: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Option<String>,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub display_order: i32,
}

impl Todo {
    fn set_completed(&mut self, completed: bool, now: NaiveDateTime) {
        self.completed = completed;
        if !completed {
            self.completed_at = None;
        } else if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub task: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub display_order: Option<i32>,
}

/// Full replacement of the editable fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub task: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
}

impl ListParams {
    fn matches(&self, todo: &Todo) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_task = todo.task.to_lowercase().contains(&needle);
            let in_description = todo
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_task && !in_description {
                return false;
            }
        }
        self.priority.is_none_or(|p| todo.priority == p)
            && self.category.is_none_or(|c| todo.category == c)
            && self.completed.is_none_or(|c| todo.completed == c)
    }
}

#[derive(Deserialize)]
pub struct ReorderEntry {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
    pub by_priority: BTreeMap<Priority, u64>,
    pub by_category: BTreeMap<Category, u64>,
}

impl Statistics {
    fn collect<'a>(todos: impl IntoIterator<Item = &'a Todo>, now: NaiveDateTime) -> Self {
        let mut stats = Statistics {
            total: 0,
            completed: 0,
            pending: 0,
            overdue: 0,
            by_priority: Priority::ALL.iter().map(|&p| (p, 0)).collect(),
            by_category: Category::ALL.iter().map(|&c| (c, 0)).collect(),
        };
        for todo in todos {
            stats.total += 1;
            if todo.completed {
                stats.completed += 1;
            }
            if todo.is_overdue(now) {
                stats.overdue += 1;
            }
            *stats.by_priority.entry(todo.priority).or_default() += 1;
            *stats.by_category.entry(todo.category).or_default() += 1;
        }
        stats.pending = stats.total - stats.completed;
        stats
    }
}

/// Ids come from a counter starting at 1 and are never reused, like an
/// identity column.
#[derive(Debug)]
pub struct Store {
    next_id: i64,
    todos: HashMap<i64, Todo>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: HashMap::new(),
        }
    }
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/statistics", get(statistics))
        .route("/api/todos/completed", delete(delete_completed))
        .route("/api/todos/reorder", patch(reorder_todos))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let mut matching: Vec<Todo> = store
        .todos
        .values()
        .filter(|t| params.matches(t))
        .cloned()
        .collect();
    matching.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then(a.created_at.cmp(&b.created_at))
    });
    Json(matching)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    if input.task.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    let display_order = input.display_order.unwrap_or_else(|| {
        store
            .todos
            .values()
            .map(|t| t.display_order)
            .max()
            .map_or(0, |max| max + 1)
    });
    let now = now();
    let mut todo = Todo {
        id: store.allocate_id(),
        task: input.task,
        description: input.description,
        completed: false,
        priority: input.priority,
        category: input.category,
        due_date: input.due_date,
        tags: input.tags,
        created_at: now,
        completed_at: None,
        updated_at: Some(now),
        display_order,
    };
    todo.set_completed(input.completed, now);
    tracing::debug!(id = %todo.id, "todo created");
    store.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StatusCode> {
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    if input.task.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    todo.task = input.task;
    todo.description = input.description;
    todo.priority = input.priority;
    todo.category = input.category;
    todo.due_date = input.due_date;
    todo.tags = input.tags;
    todo.display_order = input.display_order;
    todo.set_completed(input.completed, now());
    Ok(Json(todo.clone()))
}

async fn toggle_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let completed = !todo.completed;
    todo.set_completed(completed, now());
    Ok(Json(todo.clone()))
}

/// Position in the body becomes the new display order; unknown ids are skipped.
async fn reorder_todos(State(db): State<Db>, Json(order): Json<Vec<ReorderEntry>>) -> StatusCode {
    let mut store = db.write().await;
    for (position, entry) in order.iter().enumerate() {
        if let Some(todo) = store.todos.get_mut(&entry.id) {
            todo.display_order = position as i32;
        }
    }
    StatusCode::OK
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.todos.remove(&id).map(|_| StatusCode::OK).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_completed(State(db): State<Db>) -> StatusCode {
    let mut store = db.write().await;
    let before = store.todos.len();
    store.todos.retain(|_, todo| !todo.completed);
    tracing::debug!(removed = before - store.todos.len(), "completed todos deleted");
    StatusCode::OK
}

async fn statistics(State(db): State<Db>) -> Json<Statistics> {
    let store = db.read().await;
    Json(Statistics::collect(store.todos.values(), now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn todo(task: &str, priority: Priority, category: Category, completed: bool) -> Todo {
        Todo {
            id: 1,
            task: task.to_string(),
            description: None,
            completed,
            priority,
            category,
            due_date: None,
            tags: None,
            created_at: at(1),
            completed_at: None,
            updated_at: None,
            display_order: 0,
        }
    }

    #[test]
    fn todo_serializes_camel_case() {
        let mut t = todo("Test", Priority::High, Category::Work, false);
        t.id = 42;
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["task"], "Test");
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["category"], "WORK");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00");
        assert_eq!(json["displayOrder"], 0);
        assert!(json["dueDate"].is_null());
    }

    #[test]
    fn store_ids_are_sequential_and_not_reused() {
        let mut store = Store::default();
        assert_eq!(store.allocate_id(), 1);
        assert_eq!(store.allocate_id(), 2);
        store.todos.clear();
        assert_eq!(store.allocate_id(), 3);
    }

    #[test]
    fn create_todo_applies_defaults() {
        let input: CreateTodo = serde_json::from_str(r#"{"task":"No extras"}"#).unwrap();
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.category, Category::Personal);
        assert!(!input.completed);
        assert!(input.display_order.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_task() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn completing_stamps_and_reopening_clears_completed_at() {
        let mut t = todo("x", Priority::Low, Category::Other, false);
        t.set_completed(true, at(2));
        assert_eq!(t.completed_at, Some(at(2)));
        t.set_completed(true, at(3));
        assert_eq!(t.completed_at, Some(at(2)));
        t.set_completed(false, at(4));
        assert_eq!(t.completed_at, None);
        assert_eq!(t.updated_at, Some(at(4)));
    }

    #[test]
    fn filters_combine_conjunctively() {
        let params = ListParams {
            priority: Some(Priority::High),
            completed: Some(false),
            ..ListParams::default()
        };
        assert!(params.matches(&todo("a", Priority::High, Category::Work, false)));
        assert!(!params.matches(&todo("a", Priority::High, Category::Work, true)));
        assert!(!params.matches(&todo("a", Priority::Low, Category::Work, false)));
    }

    #[test]
    fn search_matches_task_or_description_ignoring_case() {
        let params = ListParams {
            search: Some("MILK".to_string()),
            ..ListParams::default()
        };
        assert!(params.matches(&todo("Buy milk", Priority::Low, Category::Shopping, false)));
        let mut in_description = todo("Groceries", Priority::Low, Category::Shopping, false);
        in_description.description = Some("oat milk".to_string());
        assert!(params.matches(&in_description));
        assert!(!params.matches(&todo("Bread", Priority::Low, Category::Shopping, false)));
    }

    #[test]
    fn statistics_count_every_bucket() {
        let mut late = todo("late", Priority::Urgent, Category::Work, false);
        late.due_date = Some(at(2));
        let mut done_late = todo("done", Priority::Urgent, Category::Health, true);
        done_late.due_date = Some(at(2));
        let open = todo("open", Priority::Low, Category::Work, false);

        let stats = Statistics::collect([&late, &done_late, &open], at(10));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.by_priority[&Priority::Urgent], 2);
        assert_eq!(stats.by_priority[&Priority::Medium], 0);
        assert_eq!(stats.by_category[&Category::Work], 2);
        assert_eq!(stats.by_category.len(), 6);
    }
}
