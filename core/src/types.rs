//! Wire types of the sync Documents resource.
//!
//! # Design
//! Only `sid` and `data` are load-bearing for callers; the remaining metadata
//! is optional so that partial payloads (and the mock server, which does not
//! know the account) still decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single document held by the sync service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub sid: String,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub service_sid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
    #[serde(default)]
    pub date_expires: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Document {
    /// The document's data with its `sid` merged in under the `sid` key.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut merged = self.data.clone();
        merged.insert("sid".to_string(), Value::String(self.sid.clone()));
        merged
    }
}

/// The service may send `"data": null` for a document that never had data.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paging metadata returned alongside every list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub first_page_url: Option<String>,
    #[serde(default)]
    pub previous_page_url: Option<String>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// One page of a document listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Payload for creating a document.
#[derive(Debug, Clone, Default)]
pub struct CreateDocument {
    pub unique_name: Option<String>,
    pub data: Map<String, Value>,
}

/// Payload for updating a document. `data` replaces the stored data wholesale.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub data: Map<String, Value>,
}

/// Error body returned by the sync service on failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}
