//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the board treats "the todo is
//! already gone" differently from "the server misbehaved" when reading logs.
//! All other unexpected statuses land in `HttpError` with the raw status code
//! and body. `Transport` covers failures the host reports before any response
//! exists, and `InvalidInput` covers form values that never become a request.

use thiserror::Error;

/// Errors returned by `TodoApi` parse methods and `TodoClient` completions.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one(s).
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host could not complete the HTTP round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A form field could not be turned into a request value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
