//! Stateless request builder and response parser for the sync Documents API.
//!
//! # Design
//! `SyncClient` holds the base URL, the service sid and the account
//! credentials, and carries no mutable state between calls. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! HTTP round-trip, keeping the core deterministic and free of I/O.
//!
//! Listing is paged: `parse_list_documents` returns the page's documents and
//! the next page URL, which the caller feeds back into `build_next_page`
//! until it is `None`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateDocument, Document, DocumentPage, RemoteError, UpdateDocument};

pub const DEFAULT_BASE_URL: &str = "https://sync.twilio.com/v1";

/// Page size requested when listing documents.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Everything except RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Account credentials used for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl Credentials {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }

    fn authorization(&self) -> String {
        let raw = format!("{}:{}", self.account_sid, self.auth_token);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// A decoded page of documents plus the URL of the following page, if any.
#[derive(Debug, Clone)]
pub struct ListedPage {
    pub documents: Vec<Document>,
    pub next_page_url: Option<String>,
}

/// Synchronous, stateless client for one sync service's documents.
#[derive(Debug, Clone)]
pub struct SyncClient {
    base_url: String,
    service_sid: String,
    credentials: Credentials,
}

impl SyncClient {
    pub fn new(base_url: &str, service_sid: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_sid: service_sid.to_string(),
            credentials,
        }
    }

    fn documents_url(&self) -> String {
        format!("{}/Services/{}/Documents", self.base_url, self.service_sid)
    }

    /// `sid` is caller-supplied, so it is encoded as exactly one path segment.
    fn document_url(&self, sid: &str) -> String {
        format!("{}/{}", self.documents_url(), utf8_percent_encode(sid, PATH_SEGMENT))
    }

    fn request(&self, method: HttpMethod, url: String, form: Vec<(String, String)>) -> HttpRequest {
        let mut headers = vec![
            ("authorization".to_string(), self.credentials.authorization()),
            ("accept".to_string(), "application/json".to_string()),
        ];
        if !form.is_empty() {
            headers.push((
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        }
        HttpRequest {
            method,
            url,
            headers,
            form,
        }
    }

    pub fn build_list_documents(&self, page_size: u32) -> HttpRequest {
        let url = format!("{}?PageSize={page_size}", self.documents_url());
        self.request(HttpMethod::Get, url, Vec::new())
    }

    /// Build the request for a `next_page_url` returned by a previous page.
    ///
    /// Relative URLs are resolved against the origin of the base URL.
    pub fn build_next_page(&self, next_page_url: &str) -> HttpRequest {
        let url = if next_page_url.starts_with("http://") || next_page_url.starts_with("https://") {
            next_page_url.to_string()
        } else {
            format!("{}{}", self.origin(), next_page_url)
        };
        self.request(HttpMethod::Get, url, Vec::new())
    }

    pub fn build_create_document(&self, input: &CreateDocument) -> Result<HttpRequest, ApiError> {
        let data = serde_json::to_string(&input.data).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut form = vec![("Data".to_string(), data)];
        if let Some(name) = &input.unique_name {
            form.push(("UniqueName".to_string(), name.clone()));
        }
        Ok(self.request(HttpMethod::Post, self.documents_url(), form))
    }

    pub fn build_update_document(&self, sid: &str, input: &UpdateDocument) -> Result<HttpRequest, ApiError> {
        let data = serde_json::to_string(&input.data).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let form = vec![("Data".to_string(), data)];
        Ok(self.request(HttpMethod::Post, self.document_url(sid), form))
    }

    pub fn build_fetch_document(&self, sid: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.document_url(sid), Vec::new())
    }

    pub fn build_delete_document(&self, sid: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.document_url(sid), Vec::new())
    }

    pub fn parse_list_documents(&self, response: HttpResponse) -> Result<ListedPage, ApiError> {
        check_status(&response, 200)?;
        let page: DocumentPage =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(ListedPage {
            documents: page.documents,
            next_page_url: page.meta.next_page_url.filter(|url| !url.is_empty()),
        })
    }

    pub fn parse_create_document(&self, response: HttpResponse) -> Result<Document, ApiError> {
        check_status(&response, 201)?;
        decode_document(&response)
    }

    pub fn parse_update_document(&self, response: HttpResponse) -> Result<Document, ApiError> {
        check_status(&response, 200)?;
        decode_document(&response)
    }

    pub fn parse_fetch_document(&self, response: HttpResponse) -> Result<Document, ApiError> {
        check_status(&response, 200)?;
        decode_document(&response)
    }

    pub fn parse_delete_document(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }

    /// Scheme and authority of the base URL, e.g. `https://sync.twilio.com`.
    fn origin(&self) -> &str {
        let after_scheme = self.base_url.find("://").map(|i| i + 3).unwrap_or(0);
        match self.base_url[after_scheme..].find('/') {
            Some(i) => &self.base_url[..after_scheme + i],
            None => &self.base_url,
        }
    }
}

fn decode_document(response: &HttpResponse) -> Result<Document, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    match serde_json::from_str::<RemoteError>(&response.body) {
        Ok(remote) => Err(ApiError::Remote {
            status: response.status,
            code: remote.code,
            message: remote.message,
        }),
        Err(_) => Err(ApiError::Remote {
            status: response.status,
            code: None,
            message: response.body.clone(),
        }),
    }
}
