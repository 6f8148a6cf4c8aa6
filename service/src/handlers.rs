//! The four todo route handlers.
//!
//! # Design
//! Each handler validates its body first, so a rejected request never reaches
//! the store, then makes exactly one `DocumentStore` call. Todos are returned
//! as the document's `data` with its `sid` merged in; update returns the data
//! as stored, which already carries the `sid`.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::store::StoreError;
use crate::todo::{NewTodo, TodoUpdate};
use crate::AppState;

pub const DELETED_MESSAGE: &str = "Todo sucessfully deleted!";

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let documents = state.store.list_documents().await?;
    tracing::info!(count = documents.len(), "listed todos");
    Ok(Json(documents.iter().map(|d| d.flatten()).collect()))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<Map<String, Value>>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let todo = NewTodo::from_input(&input)?;
    let document = state
        .store
        .create_document(todo.into_data(chrono::Utc::now()))
        .await?;
    tracing::info!(sid = %document.sid, "created todo");
    Ok(Json(document.flatten()))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(sid): Path<String>,
    Json(input): Json<Map<String, Value>>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let update = TodoUpdate::from_input(&input)?;
    let document = state
        .store
        .update_document(&sid, update.into_data(&sid))
        .await?;
    tracing::info!(sid = %sid, "updated todo");
    Ok(Json(document.data))
}

/// Deleting a todo that does not exist still reports success.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<Value>, AppError> {
    match state.store.delete_document(&sid).await {
        Ok(()) => tracing::info!(sid = %sid, "deleted todo"),
        Err(StoreError::NotFound(_)) => tracing::info!(sid = %sid, "todo already absent"),
        Err(err) => return Err(err.into()),
    }
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}
