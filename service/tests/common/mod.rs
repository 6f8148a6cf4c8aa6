#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{self, Request};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use sync_core::{ApiError, Document};
use todo_service::{DocumentStore, StoreError};

/// In-memory `DocumentStore` that counts every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    documents: Mutex<Vec<Document>>,
    next_sid: AtomicUsize,
    calls: AtomicUsize,
    failing: bool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store whose every call fails like an unreachable remote.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::Api(ApiError::Remote {
                status: 503,
                code: None,
                message: "Service Unavailable".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        self.record()?;
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn create_document(&self, data: Map<String, Value>) -> Result<Document, StoreError> {
        self.record()?;
        let n = self.next_sid.fetch_add(1, Ordering::SeqCst);
        let document = document(&format!("ET{n:032x}"), data);
        self.documents.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn update_document(&self, sid: &str, data: Map<String, Value>) -> Result<Document, StoreError> {
        self.record()?;
        let mut documents = self.documents.lock().unwrap();
        let existing = documents
            .iter_mut()
            .find(|d| d.sid == sid)
            .ok_or_else(|| StoreError::NotFound(sid.to_string()))?;
        existing.data = data;
        Ok(existing.clone())
    }

    async fn delete_document(&self, sid: &str) -> Result<(), StoreError> {
        self.record()?;
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.sid != sid);
        if documents.len() == before {
            return Err(StoreError::NotFound(sid.to_string()));
        }
        Ok(())
    }
}

pub fn document(sid: &str, data: Map<String, Value>) -> Document {
    Document {
        sid: sid.to_string(),
        unique_name: None,
        account_sid: None,
        service_sid: None,
        url: None,
        revision: None,
        data,
        date_created: None,
        date_updated: None,
        date_expires: None,
        created_by: None,
    }
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}
