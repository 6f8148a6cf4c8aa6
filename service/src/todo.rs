//! Todo request payloads and the document data they become.
//!
//! A todo is stored as the `data` of one remote document:
//! `{created_at, body, isDone}` on create, `{sid, body, isDone, created_at}`
//! after an update. Callers see that data with the document `sid` merged in.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::validation::{validate, FieldKind, ValidationErrors};

/// Validated input of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub body: String,
}

impl NewTodo {
    const RULES: &'static [(&'static str, FieldKind)] = &[("body", FieldKind::Text)];

    pub fn from_input(input: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        validate(input, Self::RULES)?;
        Ok(Self {
            body: text(input, "body"),
        })
    }

    pub fn into_data(self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("created_at".to_string(), Value::String(timestamp(now)));
        data.insert("body".to_string(), Value::String(self.body));
        data.insert("isDone".to_string(), Value::Bool(false));
        data
    }
}

/// Validated input of an update request. Every field is overwritten.
///
/// `created_at` is taken from the caller as-is, so it can drift from the
/// document's real creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub body: String,
    pub is_done: bool,
    pub created_at: String,
}

impl TodoUpdate {
    const RULES: &'static [(&'static str, FieldKind)] = &[
        ("body", FieldKind::Text),
        ("isDone", FieldKind::Boolean),
        ("created_at", FieldKind::Text),
    ];

    pub fn from_input(input: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        validate(input, Self::RULES)?;
        Ok(Self {
            body: text(input, "body"),
            is_done: input.get("isDone").and_then(Value::as_bool).unwrap_or_default(),
            created_at: text(input, "created_at"),
        })
    }

    pub fn into_data(self, sid: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("sid".to_string(), Value::String(sid.to_string()));
        data.insert("body".to_string(), Value::String(self.body));
        data.insert("isDone".to_string(), Value::Bool(self.is_done));
        data.insert("created_at".to_string(), Value::String(self.created_at));
        data
    }
}

fn text(input: &Map<String, Value>, field: &str) -> String {
    input
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// RFC 3339 in UTC with microseconds, e.g. `2024-01-01T12:00:00.000000Z`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
