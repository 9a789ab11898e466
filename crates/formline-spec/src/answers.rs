use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Respondent answers keyed by field id. The page navigator owns the single
/// mutable copy; evaluators receive immutable snapshots.
pub type AnswerMap = Map<String, Value>;

/// True when a value should be treated as "no answer yet": null, blank
/// text, an empty list, or a selection map with nothing selected.
#[must_use]
pub fn is_empty_answer(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(|entry| match entry {
            Value::Bool(selected) => !selected,
            other => is_empty_answer(other),
        }),
        _ => false,
    }
}

/// Human-readable rendering of a scalar answer.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// One field-scoped validation failure, surfaced next to its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_id: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating one page against an answer snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn passing() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn error_for(&self, field_id: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field_id == field_id)
    }
}
