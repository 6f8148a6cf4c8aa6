//! In-memory stand-in for a sync service's Documents REST API.
//!
//! Documents are kept per service sid in creation order. The server speaks
//! the same paths, form fields and JSON shapes as the real service closely
//! enough for the client core and the todo API to be tested end to end.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub sid: String,
    pub unique_name: Option<String>,
    pub service_sid: String,
    pub url: String,
    pub revision: String,
    pub data: Map<String, Value>,
    pub date_created: String,
    pub date_updated: String,
    pub date_expires: Option<String>,
    pub created_by: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(rename = "PageSize")]
    pub page_size: Option<u32>,
    #[serde(rename = "Page")]
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct DocumentForm {
    #[serde(rename = "Data")]
    pub data: Option<String>,
    #[serde(rename = "UniqueName")]
    pub unique_name: Option<String>,
}

/// Documents per service sid, in creation order.
pub type Db = Arc<RwLock<HashMap<String, Vec<Document>>>>;

/// Error body in the shape the real service returns.
#[derive(Debug)]
pub struct MockError {
    status: StatusCode,
    code: u32,
    message: String,
}

impl MockError {
    fn new(status: StatusCode, code: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            20404,
            format!("The requested resource {path} was not found"),
        )
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.code,
            "message": self.message,
            "more_info": format!("https://www.twilio.com/docs/errors/{}", self.code),
            "status": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(
            "/v1/Services/{service}/Documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/Services/{service}/Documents/{sid}",
            get(fetch_document).post(update_document).delete(delete_document),
        )
        .layer(middleware::from_fn(require_basic_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_basic_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic ") && v.len() > "Basic ".len());
    if !authorized {
        return MockError::new(StatusCode::UNAUTHORIZED, 20003, "Authenticate").into_response();
    }
    next.run(request).await
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn parse_data(raw: Option<&str>) -> Result<Option<Map<String, Value>>, MockError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(MockError::new(
            StatusCode::BAD_REQUEST,
            20001,
            "Data must be a JSON object",
        )),
    }
}

fn page_url(host: Option<&str>, service: &str, page_size: u32, page: u32) -> String {
    let path = format!("/v1/Services/{service}/Documents?PageSize={page_size}&Page={page}");
    match host {
        Some(host) => format!("http://{host}{path}"),
        None => path,
    }
}

async fn list_documents(
    State(db): State<Db>,
    Path(service): Path<String>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Json<Value> {
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = params.page.unwrap_or(0);
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());

    let services = db.read().await;
    let all = services.get(&service).map(Vec::as_slice).unwrap_or_default();
    let start = (page as usize).saturating_mul(page_size as usize);
    let documents: Vec<Document> = all
        .iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect();
    let has_next = start + documents.len() < all.len();

    Json(json!({
        "documents": documents,
        "meta": {
            "page": page,
            "page_size": page_size,
            "first_page_url": page_url(host, &service, page_size, 0),
            "previous_page_url": (page > 0).then(|| page_url(host, &service, page_size, page - 1)),
            "next_page_url": has_next.then(|| page_url(host, &service, page_size, page + 1)),
            "url": page_url(host, &service, page_size, page),
            "key": "documents",
        }
    }))
}

async fn create_document(
    State(db): State<Db>,
    Path(service): Path<String>,
    Form(input): Form<DocumentForm>,
) -> Result<(StatusCode, Json<Document>), MockError> {
    let data = parse_data(input.data.as_deref())?.unwrap_or_default();
    let mut services = db.write().await;
    let documents = services.entry(service.clone()).or_default();

    if let Some(name) = &input.unique_name {
        if documents.iter().any(|d| d.unique_name.as_ref() == Some(name)) {
            return Err(MockError::new(
                StatusCode::CONFLICT,
                54301,
                format!("Unique name already exists: {name}"),
            ));
        }
    }

    let sid = format!("ET{}", Uuid::new_v4().simple());
    let timestamp = now();
    let document = Document {
        url: format!("/v1/Services/{service}/Documents/{sid}"),
        sid,
        unique_name: input.unique_name,
        service_sid: service,
        revision: "0".to_string(),
        data,
        date_created: timestamp.clone(),
        date_updated: timestamp,
        date_expires: None,
        created_by: "system".to_string(),
    };
    documents.push(document.clone());
    tracing::info!(sid = %document.sid, "document created");
    Ok((StatusCode::CREATED, Json(document)))
}

/// Documents are addressable by sid or by unique name.
fn matches_id(document: &Document, id: &str) -> bool {
    document.sid == id || document.unique_name.as_deref() == Some(id)
}

async fn fetch_document(
    State(db): State<Db>,
    Path((service, sid)): Path<(String, String)>,
) -> Result<Json<Document>, MockError> {
    let services = db.read().await;
    services
        .get(&service)
        .and_then(|docs| docs.iter().find(|d| matches_id(d, &sid)))
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::not_found(&format!("/v1/Services/{service}/Documents/{sid}")))
}

async fn update_document(
    State(db): State<Db>,
    Path((service, sid)): Path<(String, String)>,
    Form(input): Form<DocumentForm>,
) -> Result<Json<Document>, MockError> {
    let data = parse_data(input.data.as_deref())?;
    let mut services = db.write().await;
    let document = services
        .get_mut(&service)
        .and_then(|docs| docs.iter_mut().find(|d| matches_id(d, &sid)))
        .ok_or_else(|| MockError::not_found(&format!("/v1/Services/{service}/Documents/{sid}")))?;

    if let Some(data) = data {
        document.data = data;
    }
    let revision = document.revision.parse::<u64>().unwrap_or(0) + 1;
    document.revision = revision.to_string();
    document.date_updated = now();
    Ok(Json(document.clone()))
}

async fn delete_document(
    State(db): State<Db>,
    Path((service, sid)): Path<(String, String)>,
) -> Result<StatusCode, MockError> {
    let mut services = db.write().await;
    let documents = services
        .get_mut(&service)
        .ok_or_else(|| MockError::not_found(&format!("/v1/Services/{service}/Documents/{sid}")))?;
    let index = documents
        .iter()
        .position(|d| matches_id(d, &sid))
        .ok_or_else(|| MockError::not_found(&format!("/v1/Services/{service}/Documents/{sid}")))?;
    let removed = documents.remove(index);
    tracing::info!(sid = %removed.sid, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_with_wire_field_names() {
        let document = Document {
            sid: "ET1".to_string(),
            unique_name: None,
            service_sid: "IS1".to_string(),
            url: "/v1/Services/IS1/Documents/ET1".to_string(),
            revision: "0".to_string(),
            data: Map::new(),
            date_created: "2024-01-01T00:00:00Z".to_string(),
            date_updated: "2024-01-01T00:00:00Z".to_string(),
            date_expires: None,
            created_by: "system".to_string(),
        };
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["sid"], "ET1");
        assert_eq!(json["service_sid"], "IS1");
        assert!(json["unique_name"].is_null());
        assert!(json["data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn parse_data_accepts_objects_only() {
        assert!(parse_data(Some(r#"{"body":"x"}"#)).unwrap().is_some());
        assert!(parse_data(None).unwrap().is_none());
        assert!(parse_data(Some("[1,2]")).is_err());
        assert!(parse_data(Some("not json")).is_err());
    }

    #[test]
    fn page_url_is_relative_without_host() {
        assert_eq!(
            page_url(None, "IS1", 10, 2),
            "/v1/Services/IS1/Documents?PageSize=10&Page=2"
        );
        assert_eq!(
            page_url(Some("127.0.0.1:9000"), "IS1", 10, 0),
            "http://127.0.0.1:9000/v1/Services/IS1/Documents?PageSize=10&Page=0"
        );
    }

    #[test]
    fn documents_match_by_sid_or_unique_name() {
        let document = Document {
            sid: "ET1".to_string(),
            unique_name: Some("groceries".to_string()),
            service_sid: "IS1".to_string(),
            url: String::new(),
            revision: "0".to_string(),
            data: Map::new(),
            date_created: String::new(),
            date_updated: String::new(),
            date_expires: None,
            created_by: "system".to_string(),
        };
        assert!(matches_id(&document, "ET1"));
        assert!(matches_id(&document, "groceries"));
        assert!(!matches_id(&document, "ET2"));
    }
}
