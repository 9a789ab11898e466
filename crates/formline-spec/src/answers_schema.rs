//! JSON schema for the answer map of the currently visible fields, used by
//! stores that want to validate a submission body without loading this
//! crate's validator.

use serde_json::{Map, Value, json};

use crate::contract::{ValueShape, input_contract};
use crate::spec::field::FormField;
use crate::spec::template::FormTemplate;
use crate::visibility::VisibilityMap;

/// Builds the schema for one visibility snapshot. Hidden and structural
/// fields are omitted entirely; required visible fields land in `required`.
#[must_use]
pub fn generate(template: &FormTemplate, visibility: &VisibilityMap) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (_, field) in template.fields() {
        if !field.field_type.is_answerable() {
            continue;
        }
        if !visibility.get(&field.id).copied().unwrap_or(true) {
            continue;
        }
        properties.insert(field.id.clone(), field_schema(field));
        if field.validation.required {
            required.push(Value::String(field.id.clone()));
        }
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &FormField) -> Value {
    let mut schema = match input_contract(field.field_type).value_shape() {
        ValueShape::Text => json!({ "type": "string" }),
        ValueShape::OptionValue => {
            if field.options.is_empty() {
                json!({ "type": "string" })
            } else {
                json!({ "type": "string", "enum": option_values(field) })
            }
        }
        ValueShape::BoolMap => json!({
            "type": "object",
            "additionalProperties": { "type": "boolean" },
        }),
        ValueShape::Integer => json!({ "type": "integer" }),
        ValueShape::ValueList => json!({
            "type": "array",
            "items": { "type": "string" },
        }),
        ValueShape::RangeObject => json!({
            "type": "object",
            "properties": {
                "start": { "type": "string" },
                "end": { "type": "string" },
            },
            "required": ["start", "end"],
        }),
        ValueShape::NoValue => json!({}),
    };

    if let Some(object) = schema.as_object_mut() {
        if let Some(min_length) = field.validation.min_length {
            object.insert("minLength".into(), json!(min_length));
        }
        if let Some(max_length) = field.validation.max_length {
            object.insert("maxLength".into(), json!(max_length));
        }
        if let Some(pattern) = &field.validation.pattern {
            object.insert("pattern".into(), json!(pattern));
        }
        if let Some(min) = field.validation.min {
            object.insert("minimum".into(), json!(min));
        }
        if let Some(max) = field.validation.max {
            object.insert("maximum".into(), json!(max));
        }
        if let Some(description) = &field.description {
            object.insert("description".into(), json!(description));
        }
    }

    schema
}

fn option_values(field: &FormField) -> Value {
    Value::Array(
        field
            .options
            .iter()
            .map(|option| Value::String(option.value.clone()))
            .collect(),
    )
}
