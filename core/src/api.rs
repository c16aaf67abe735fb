//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoApi` holds only a `base_url` (the `/api/todos` collection URL) and
//! carries no mutable state between calls. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the round-trip in between.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, ReorderEntry, Statistics, Todo, TodoFilter, TodoId, UpdateTodo};

/// Statuses accepted for endpoints that answer without a body.
const EMPTY_OK: &[u16] = &[200, 204];

#[derive(Debug, Clone)]
pub struct TodoApi {
    base_url: String,
}

impl TodoApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.base_url)
    }

    fn item_url(&self, id: &TodoId, suffix: &str) -> String {
        format!("{}/{}{suffix}", self.base_url, id.path_segment())
    }

    pub fn build_list_todos(&self, filter: &TodoFilter) -> HttpRequest {
        let url = match filter.query_string() {
            Some(query) => format!("{}?{query}", self.base_url),
            None => self.base_url.clone(),
        };
        HttpRequest::new(HttpMethod::Get, url)
    }

    pub fn build_get_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item_url(id, ""))
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.url("")).with_json(to_json(input)?))
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.item_url(id, "")).with_json(to_json(input)?))
    }

    pub fn build_toggle_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest::new(HttpMethod::Patch, self.item_url(id, "/toggle"))
    }

    /// `ids` is the complete list in its new display order.
    pub fn build_reorder_todos(&self, ids: &[TodoId]) -> Result<HttpRequest, ApiError> {
        let entries: Vec<ReorderEntry> = ids.iter().map(|id| ReorderEntry { id: id.clone() }).collect();
        Ok(HttpRequest::new(HttpMethod::Patch, self.url("/reorder")).with_json(to_json(&entries)?))
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.item_url(id, ""))
    }

    pub fn build_delete_completed(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.url("/completed"))
    }

    pub fn build_statistics(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.url("/statistics"))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[201])?;
        from_json(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_reorder_todos(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, EMPTY_OK)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, EMPTY_OK)
    }

    pub fn parse_delete_completed(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, EMPTY_OK)
    }

    pub fn parse_statistics(&self, response: HttpResponse) -> Result<Statistics, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
