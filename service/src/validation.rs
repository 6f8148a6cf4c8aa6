//! Required-field checks on JSON request bodies.
//!
//! A field is missing when it is absent, `null`, or a string that is empty
//! after trimming. Present fields are then type-checked.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Boolean,
}

/// Field-level validation failures, in rule order.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq)]
#[error("The given data was invalid.")]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn add(&mut self, field: &str, message: String) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or_default()
    }
}

// Serialized as an ordered `{"field": ["message", ...]}` object.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Check every `(field, kind)` rule against `input`, collecting all failures.
pub fn validate(input: &Map<String, Value>, rules: &[(&str, FieldKind)]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for &(field, kind) in rules {
        let value = input.get(field);
        if is_missing(value) {
            errors.add(field, format!("The {field} field is required."));
            continue;
        }
        match (kind, value) {
            (FieldKind::Text, Some(Value::String(_))) | (FieldKind::Boolean, Some(Value::Bool(_))) => {}
            (FieldKind::Text, _) => errors.add(field, format!("The {field} must be a string.")),
            (FieldKind::Boolean, _) => errors.add(field, format!("The {field} field must be true or false.")),
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    const RULES: &[(&str, FieldKind)] = &[
        ("body", FieldKind::Text),
        ("isDone", FieldKind::Boolean),
        ("created_at", FieldKind::Text),
    ];

    #[test]
    fn complete_input_passes() {
        let input = object(json!({"body": "x", "isDone": false, "created_at": "2024-01-01"}));
        assert!(validate(&input, RULES).is_ok());
    }

    #[test]
    fn false_is_not_missing() {
        let input = object(json!({"body": "x", "isDone": false, "created_at": "t"}));
        assert!(validate(&input, &[("isDone", FieldKind::Boolean)]).is_ok());
    }

    #[test]
    fn absent_null_and_blank_are_missing() {
        let input = object(json!({"body": "   ", "isDone": null}));
        let errors = validate(&input, RULES).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["body", "isDone", "created_at"]);
        assert_eq!(errors.messages("body"), ["The body field is required."]);
    }

    #[test]
    fn wrong_types_are_reported() {
        let input = object(json!({"body": 12, "isDone": "yes", "created_at": "t"}));
        let errors = validate(&input, RULES).unwrap_err();
        assert_eq!(errors.messages("body"), ["The body must be a string."]);
        assert_eq!(errors.messages("isDone"), ["The isDone field must be true or false."]);
        assert!(errors.messages("created_at").is_empty());
    }

    #[test]
    fn errors_serialize_in_rule_order() {
        let errors = validate(&Map::new(), RULES).unwrap_err();
        let rendered = serde_json::to_string(&errors).unwrap();
        assert_eq!(
            rendered,
            r#"{"body":["The body field is required."],"isDone":["The isDone field is required."],"created_at":["The created_at field is required."]}"#
        );
    }
}
