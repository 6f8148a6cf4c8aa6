//! Synchronous client core for a sync service's Documents API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `SyncClient` is stateless: base URL, service sid and credentials only.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Listing is paged; callers loop on `ListedPage::next_page_url`.
//! - Wire types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{Credentials, ListedPage, SyncClient, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateDocument, Document, DocumentPage, PageMeta, UpdateDocument};
