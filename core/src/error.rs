//! Error types for the sync documents client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers treat a missing
//! document differently from other failures (deleting an absent todo is not
//! an error for the API layer). Every other non-success response lands in
//! `Remote`, carrying the service's error code and message when the body
//! could be decoded.

use thiserror::Error;

/// Errors returned by `SyncClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote service returned 404 for the document or service.
    #[error("resource not found")]
    NotFound,

    /// The remote service returned an unexpected status.
    #[error("remote returned HTTP {status}: {message}")]
    Remote {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
