//! `DocumentStore` backed by the remote sync service.
//!
//! Requests are built and parsed by `sync_core::SyncClient`; this module only
//! executes them with a blocking `ureq` agent on tokio's blocking pool.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sync_core::{
    ApiError, CreateDocument, Document, HttpMethod, HttpRequest, HttpResponse, SyncClient,
    UpdateDocument, DEFAULT_PAGE_SIZE,
};

use crate::config::SyncConfig;
use crate::store::{DocumentStore, StoreError};

#[derive(Clone)]
pub struct SyncStore {
    client: SyncClient,
    agent: ureq::Agent,
    page_size: u32,
}

impl SyncStore {
    pub fn new(config: &SyncConfig) -> Self {
        // Status interpretation belongs to SyncClient, so 4xx/5xx come back as data.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            client: SyncClient::new(&config.base_url, &config.service_sid, config.credentials.clone()),
            agent,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        let agent = self.agent.clone();
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sync request");
        tokio::task::spawn_blocking(move || execute(&agent, request)).await?
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        // ureq sets the form content type itself.
        if name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, StoreError> {
    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(&request.url), &request.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&request.url), &request.headers).call(),
        HttpMethod::Post => with_headers(agent.post(&request.url), &request.headers)
            .send_form(request.form.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
    };
    let mut response = result.map_err(|e| StoreError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    Ok(HttpResponse::new(status, body))
}

fn not_found_as(sid: &str, err: ApiError) -> StoreError {
    match err {
        ApiError::NotFound => StoreError::NotFound(sid.to_string()),
        other => StoreError::Api(other),
    }
}

#[async_trait]
impl DocumentStore for SyncStore {
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        let response = self.round_trip(self.client.build_list_documents(self.page_size)).await?;
        let mut page = self.client.parse_list_documents(response)?;
        let mut documents = std::mem::take(&mut page.documents);

        while let Some(next) = page.next_page_url.take() {
            let response = self.round_trip(self.client.build_next_page(&next)).await?;
            page = self.client.parse_list_documents(response)?;
            documents.append(&mut page.documents);
        }
        Ok(documents)
    }

    async fn create_document(&self, data: Map<String, Value>) -> Result<Document, StoreError> {
        let request = self.client.build_create_document(&CreateDocument {
            unique_name: None,
            data,
        })?;
        let response = self.round_trip(request).await?;
        Ok(self.client.parse_create_document(response)?)
    }

    async fn update_document(&self, sid: &str, data: Map<String, Value>) -> Result<Document, StoreError> {
        let request = self.client.build_update_document(sid, &UpdateDocument { data })?;
        let response = self.round_trip(request).await?;
        self.client
            .parse_update_document(response)
            .map_err(|e| not_found_as(sid, e))
    }

    async fn delete_document(&self, sid: &str) -> Result<(), StoreError> {
        let response = self.round_trip(self.client.build_delete_document(sid)).await?;
        self.client
            .parse_delete_document(response)
            .map_err(|e| not_found_as(sid, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn not_found_maps_to_store_not_found() {
        let err = not_found_as("ET1", ApiError::NotFound);
        assert!(matches!(err, StoreError::NotFound(ref sid) if sid == "ET1"));
    }

    #[test]
    fn other_api_errors_pass_through() {
        let err = not_found_as(
            "ET1",
            ApiError::Remote {
                status: 429,
                code: Some(20429),
                message: "Too Many Requests".to_string(),
            },
        );
        assert!(matches!(err, StoreError::Api(ApiError::Remote { status: 429, .. })));
    }

    #[test]
    fn page_size_is_at_least_one() {
        let config = Config::new("AC1", "token", "IS1");
        let store = SyncStore::new(&config.sync).with_page_size(0);
        assert_eq!(store.page_size, 1);
    }

    #[tokio::test]
    async fn unreachable_remote_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        // listener dropped, nothing accepts on addr
        let config = Config::new("AC1", "token", "IS1").with_base_url(format!("http://{addr}/v1"));
        let store = SyncStore::new(&config.sync);
        let err = store.list_documents().await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
