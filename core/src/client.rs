//! The todo board component.
//!
//! # Design
//! `TodoClient` owns all UI state: the cached list, filter and form fields,
//! the panel/modal/theme toggles and the drag state. Every user action that
//! needs the server returns a [`PendingCall`]; the host executes its request
//! and feeds the response back through [`TodoClient::complete`] (or lets
//! [`TodoClient::dispatch`] do both with a [`Transport`]).
//!
//! The cached list is never a source of truth. Completions replace or patch
//! it with whatever the server returned. The only local edit made ahead of
//! the server is the reorder splice, and it is not rolled back when the
//! request fails. Failures are logged and otherwise leave state untouched.

use tracing::{debug, warn};

use crate::api::TodoApi;
use crate::config::ClientConfig;
use crate::drag::{move_item, DragState};
use crate::error::ApiError;
use crate::form::TodoForm;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Category, Priority, Statistics, Todo, TodoFilter, TodoId};

/// Which endpoint a request targets, so the response can be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Toggle(TodoId),
    Delete(TodoId),
    DeleteCompleted,
    Reorder,
    Statistics,
}

/// A request waiting to be executed by the host.
#[derive(Debug, Clone)]
pub struct PendingCall {
    pub call: Call,
    pub request: HttpRequest,
}

#[derive(Debug, Clone)]
pub struct TodoClient {
    api: TodoApi,
    todos: Vec<Todo>,
    filter: TodoFilter,
    form: TodoForm,
    drag: DragState,
    statistics: Option<Statistics>,
    filters_open: bool,
    statistics_open: bool,
    dark_mode: bool,
}

impl TodoClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_api(TodoApi::from_config(config))
    }

    pub fn with_api(api: TodoApi) -> Self {
        Self {
            api,
            todos: Vec::new(),
            filter: TodoFilter::default(),
            form: TodoForm::default(),
            drag: DragState::default(),
            statistics: None,
            filters_open: false,
            statistics_open: false,
            dark_mode: false,
        }
    }

    pub fn api(&self) -> &TodoApi {
        &self.api
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn filter(&self) -> &TodoFilter {
        &self.filter
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    /// Form fields are edited in place; nothing is sent until
    /// [`submit_form`](Self::submit_form).
    pub fn form_mut(&mut self) -> &mut TodoForm {
        &mut self.form
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn is_filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn is_statistics_open(&self) -> bool {
        self.statistics_open
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    // --- list / filters ---

    /// Fetch the list with the current filter. Used for the initial load.
    pub fn load(&self) -> PendingCall {
        pending(Call::List, self.api.build_list_todos(&self.filter))
    }

    /// Every keystroke re-fetches; there is no debounce.
    pub fn set_search(&mut self, search: impl Into<String>) -> PendingCall {
        self.filter.search = search.into();
        self.load()
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) -> PendingCall {
        self.filter.priority = priority;
        self.load()
    }

    pub fn set_category_filter(&mut self, category: Option<Category>) -> PendingCall {
        self.filter.category = category;
        self.load()
    }

    pub fn set_completed_filter(&mut self, completed: Option<bool>) -> PendingCall {
        self.filter.completed = completed;
        self.load()
    }

    pub fn clear_filters(&mut self) -> PendingCall {
        self.filter = TodoFilter::default();
        self.load()
    }

    // --- mutations ---

    /// Returns `Ok(None)` for a blank task: nothing is sent and the form is
    /// left as is.
    ///
    /// A form that cannot become a request (an unparseable due date) is
    /// logged and returned as the error; the form is left as is.
    pub fn submit_form(&mut self) -> Result<Option<PendingCall>, ApiError> {
        let request = self
            .form
            .to_new_todo()
            .and_then(|new_todo| new_todo.map(|t| self.api.build_create_todo(&t)).transpose());
        match request {
            Ok(Some(request)) => Ok(Some(pending(Call::Create, request))),
            Ok(None) => {
                debug!("ignoring submit with blank task");
                Ok(None)
            }
            Err(err) => {
                warn!(call = ?Call::Create, error = %err, "todo form rejected");
                Err(err)
            }
        }
    }

    pub fn toggle(&self, id: &TodoId) -> PendingCall {
        pending(Call::Toggle(id.clone()), self.api.build_toggle_todo(id))
    }

    pub fn delete(&self, id: &TodoId) -> PendingCall {
        pending(Call::Delete(id.clone()), self.api.build_delete_todo(id))
    }

    /// `None` when no cached item is completed, matching the disabled
    /// "Clear Done" button.
    pub fn clear_completed(&self) -> Option<PendingCall> {
        if !self.todos.iter().any(|todo| todo.completed) {
            return None;
        }
        Some(pending(Call::DeleteCompleted, self.api.build_delete_completed()))
    }

    // --- drag and drop ---

    pub fn drag_start(&mut self, id: &TodoId) {
        self.drag.start(id.clone());
    }

    pub fn drag_enter(&mut self, id: &TodoId) {
        self.drag.enter(id.clone());
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    /// Moves the dragged item into `target`'s current index and returns the
    /// request persisting the full new order. The splice is kept even if that
    /// request later fails.
    pub fn drop_on(&mut self, target: &TodoId) -> Option<PendingCall> {
        let dragged = self.drag.dragging.take();
        self.drag.end();
        let from = self.position(&dragged?)?;
        let to = self.position(target)?;
        if !move_item(&mut self.todos, from, to) {
            return None;
        }

        let ids: Vec<TodoId> = self.todos.iter().map(|todo| todo.id.clone()).collect();
        match self.api.build_reorder_todos(&ids) {
            Ok(request) => Some(pending(Call::Reorder, request)),
            Err(err) => {
                warn!(error = %err, "could not build reorder request");
                None
            }
        }
    }

    // --- statistics modal / toggles ---

    /// The modal opens once the statistics arrive.
    pub fn open_statistics(&self) -> PendingCall {
        pending(Call::Statistics, self.api.build_statistics())
    }

    pub fn close_statistics(&mut self) {
        self.statistics_open = false;
    }

    pub fn toggle_filters_panel(&mut self) {
        self.filters_open = !self.filters_open;
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    // --- completion ---

    /// Merge the response for `call` into local state.
    ///
    /// On failure the error is logged, state is left unchanged, and the error
    /// is handed back for hosts that want to observe it.
    pub fn complete(&mut self, call: Call, response: HttpResponse) -> Result<(), ApiError> {
        let result = self.apply(&call, response);
        if let Err(err) = &result {
            warn!(?call, error = %err, "todo request failed");
        }
        result
    }

    /// Execute `pending` with `transport` and merge the result.
    pub fn dispatch<T: Transport>(&mut self, transport: &T, pending: PendingCall) -> Result<(), ApiError> {
        match transport.execute(&pending.request) {
            Ok(response) => self.complete(pending.call, response),
            Err(err) => {
                warn!(call = ?pending.call, error = %err, "todo request failed");
                Err(err)
            }
        }
    }

    fn apply(&mut self, call: &Call, response: HttpResponse) -> Result<(), ApiError> {
        match call {
            Call::List => {
                self.todos = self.api.parse_list_todos(response)?;
                debug!(count = self.todos.len(), "todo list replaced");
            }
            Call::Create => {
                let todo = self.api.parse_create_todo(response)?;
                debug!(id = %todo.id, "todo created");
                self.todos.push(todo);
                self.form.reset();
            }
            Call::Toggle(id) => {
                let updated = self.api.parse_toggle_todo(response)?;
                if let Some(slot) = self.todos.iter_mut().find(|todo| &todo.id == id) {
                    *slot = updated;
                }
            }
            Call::Delete(id) => {
                self.api.parse_delete_todo(response)?;
                self.todos.retain(|todo| &todo.id != id);
            }
            Call::DeleteCompleted => {
                self.api.parse_delete_completed(response)?;
                self.todos.retain(|todo| !todo.completed);
            }
            Call::Reorder => self.api.parse_reorder_todos(response)?,
            Call::Statistics => {
                self.statistics = Some(self.api.parse_statistics(response)?);
                self.statistics_open = true;
            }
        }
        Ok(())
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| &todo.id == id)
    }
}

fn pending(call: Call, request: HttpRequest) -> PendingCall {
    debug!(?call, method = %request.method, url = %request.url, "todo request built");
    PendingCall { call, request }
}
