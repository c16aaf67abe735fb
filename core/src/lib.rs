//! Client core for the todo board.
//!
//! # Overview
//! [`TodoClient`] owns the board's UI state and turns every user action into
//! an [`HttpRequest`]; the host executes the round-trip and hands the
//! [`HttpResponse`] back to be merged. Nothing here touches the network, so
//! the component behaves the same in a browser shell and in tests.
//!
//! # Design
//! - [`TodoApi`] is the stateless request builder / response parser, one
//!   `build_*` / `parse_*` pair per endpoint.
//! - [`TodoClient`] caches the list the server last returned and patches it
//!   from each response. The reorder splice is the only optimistic edit.
//! - [`TodoClient::view`] produces the render model with its CSS classes.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod drag;
pub mod error;
pub mod form;
pub mod http;
pub mod types;
pub mod view;

pub use api::TodoApi;
pub use client::{Call, PendingCall, TodoClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use form::TodoForm;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{
    Category, NewTodo, Priority, ReorderEntry, Statistics, Todo, TodoFilter, TodoId, UpdateTodo,
};
pub use view::{BoardView, Counts, StatisticsView, TodoRow};
