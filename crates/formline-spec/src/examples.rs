//! Example answer generation for previews and store fixtures.

use serde_json::{Map, Value, json};

use crate::contract::{InputContract, input_contract};
use crate::spec::field::FormField;
use crate::spec::template::FormTemplate;
use crate::visibility::VisibilityMap;

/// Produces one plausible answer per visible, answerable field.
#[must_use]
pub fn generate(template: &FormTemplate, visibility: &VisibilityMap) -> Value {
    let mut answers = Map::new();
    for (_, field) in template.fields() {
        if !field.field_type.is_answerable() {
            continue;
        }
        if !visibility.get(&field.id).copied().unwrap_or(true) {
            continue;
        }
        answers.insert(field.id.clone(), example_value(field));
    }
    Value::Object(answers)
}

fn example_value(field: &FormField) -> Value {
    match input_contract(field.field_type) {
        InputContract::Text | InputContract::TextArea | InputContract::SecretText => {
            Value::String(format!("example-{}", field.id))
        }
        InputContract::NumericText => json!("42"),
        InputContract::SingleChoice => first_option(field),
        InputContract::MultiChoice => {
            let mut selection = Map::new();
            if let Some(option) = field.options.first() {
                selection.insert(option.value.clone(), Value::Bool(true));
            }
            Value::Object(selection)
        }
        InputContract::Rating => json!(5),
        InputContract::Scale => json!(field.validation.min.unwrap_or(0.0) as i64),
        InputContract::Ranking => Value::Array(
            field
                .options
                .iter()
                .map(|option| Value::String(option.value.clone()))
                .collect(),
        ),
        InputContract::DateInput => json!("2024-06-01"),
        InputContract::TimeInput => json!("09:30"),
        InputContract::DateTimeInput => json!("2024-06-01T09:30:00Z"),
        InputContract::DateRange => json!({ "start": "2024-06-01", "end": "2024-06-07" }),
        InputContract::FileRef => json!("https://example.com/upload.pdf"),
        InputContract::Signature => json!("https://example.com/signature.png"),
        InputContract::ColorValue => json!("#1a7f5a"),
        InputContract::Display => Value::Null,
    }
}

fn first_option(field: &FormField) -> Value {
    field
        .options
        .first()
        .map(|option| Value::String(option.value.clone()))
        .unwrap_or_else(|| Value::String(format!("example-{}", field.id)))
}
