//! The document-store capability the todo handlers are written against.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sync_core::{ApiError, Document};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A keyed collection of JSON documents held somewhere else.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents, in the order the store returns them.
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;

    async fn create_document(&self, data: Map<String, Value>) -> Result<Document, StoreError>;

    /// Replace the data of document `sid` wholesale.
    async fn update_document(&self, sid: &str, data: Map<String, Value>) -> Result<Document, StoreError>;

    async fn delete_document(&self, sid: &str) -> Result<(), StoreError>;
}
