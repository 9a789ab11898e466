use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;

use crate::answers::{AnswerMap, FieldError, ValidationReport, is_empty_answer};
use crate::contract::input_contract;
use crate::spec::field::{FieldType, FormField};
use crate::spec::template::FormTemplate;
use crate::visibility::resolve_visibility;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("static pattern"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s().-]{7,20}$").expect("static pattern"));
static COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static pattern"));

/// Validates every currently visible, answerable field on one page.
/// Hidden fields are skipped regardless of their own `required` flag;
/// that exemption is what keeps multi-branch forms submittable.
#[must_use]
pub fn validate_page(template: &FormTemplate, page_id: &str, answers: &AnswerMap) -> ValidationReport {
    let visibility = resolve_visibility(template, answers);
    let mut errors = Vec::new();

    if let Some(page) = template.page(page_id) {
        for field in &page.fields {
            if !field.field_type.is_answerable() {
                continue;
            }
            if !visibility.get(&field.id).copied().unwrap_or(true) {
                continue;
            }
            if let Some(error) = validate_field(field, answers.get(&field.id)) {
                errors.push(error);
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validates one field against its (possibly absent) answer. Pure: neither
/// the schema nor the answer is touched. Rule precedence: required, then
/// the kind's format, then length bounds, then numeric bounds.
#[must_use]
pub fn validate_field(field: &FormField, value: Option<&Value>) -> Option<FieldError> {
    if !field.field_type.is_answerable() {
        return None;
    }

    let value = match value {
        Some(value) if !is_empty_answer(value) => value,
        _ => {
            return field
                .validation
                .required
                .then(|| FieldError::new(&field.id, "required", "This field is required"));
        }
    };

    if !input_contract(field.field_type).accepts(value) {
        return Some(format_failure(field));
    }
    if let Some(error) = check_format(field, value) {
        return Some(error);
    }
    if let Some(error) = check_length(field, value) {
        return Some(error);
    }
    check_bounds(field, value)
}

/// Kind-specific format rules, applied after the coarse shape check.
fn check_format(field: &FormField, value: &Value) -> Option<FieldError> {
    match field.field_type {
        FieldType::Email => text_matches(field, value, &EMAIL),
        FieldType::Url => text_matches(field, value, &URL),
        FieldType::Phone => text_matches(field, value, &PHONE),
        FieldType::ColorPicker => text_matches(field, value, &COLOR),
        FieldType::Number | FieldType::Currency => {
            let ok = value
                .as_str()
                .is_some_and(|text| text.trim().parse::<f64>().is_ok());
            (!ok).then(|| format_failure(field))
        }
        FieldType::Date => {
            let ok = value.as_str().is_some_and(|text| parse_date(text).is_some());
            (!ok).then(|| format_failure(field))
        }
        FieldType::Time => {
            let ok = value.as_str().is_some_and(|text| parse_time(text).is_some());
            (!ok).then(|| format_failure(field))
        }
        FieldType::DateTime => {
            let ok = value
                .as_str()
                .is_some_and(|text| parse_date_time(text).is_some());
            (!ok).then(|| format_failure(field))
        }
        FieldType::DateRange => check_date_range(field, value),
        FieldType::MultipleChoice | FieldType::Dropdown | FieldType::PictureChoice => {
            check_single_choice(field, value)
        }
        FieldType::Checkboxes => check_multi_choice(field, value),
        FieldType::Ranking => check_ranking(field, value),
        FieldType::Rating => {
            let ok = value
                .as_i64()
                .is_some_and(|rating| (1..=5).contains(&rating));
            (!ok).then(|| format_failure(field))
        }
        // Scale bounds are enforced with the numeric-bound defaults below.
        FieldType::Slider | FieldType::OpinionScale => None,
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Password
        | FieldType::FileUpload
        | FieldType::Signature
        | FieldType::Location
        | FieldType::Address
        | FieldType::Unknown => None,
        FieldType::Heading
        | FieldType::Paragraph
        | FieldType::Banner
        | FieldType::Divider
        | FieldType::Image
        | FieldType::Video => None,
    }
}

/// Author-supplied pattern plus length bounds for text answers.
fn check_length(field: &FormField, value: &Value) -> Option<FieldError> {
    let rules = &field.validation;

    if let Some(pattern) = &rules.pattern
        && let Some(text) = value.as_str()
        && let Ok(regex) = Regex::new(pattern)
        && !regex.is_match(text)
    {
        return Some(FieldError::new(
            &field.id,
            "pattern",
            "Answer does not match the expected format",
        ));
    }

    if let Some(min_length) = rules.min_length
        && let Some(text) = value.as_str()
        && text.chars().count() < min_length
    {
        return Some(FieldError::new(
            &field.id,
            "min_length",
            format!("Must be at least {min_length} characters"),
        ));
    }

    if let Some(max_length) = rules.max_length
        && let Some(text) = value.as_str()
        && text.chars().count() > max_length
    {
        return Some(FieldError::new(
            &field.id,
            "max_length",
            format!("Must be at most {max_length} characters"),
        ));
    }

    None
}

fn check_bounds(field: &FormField, value: &Value) -> Option<FieldError> {
    let number = numeric_answer(field.field_type, value)?;
    let (min, max) = effective_bounds(field);

    if let Some(min) = min
        && number < min
    {
        return Some(FieldError::new(
            &field.id,
            "min",
            format!("Must be at least {min}"),
        ));
    }
    if let Some(max) = max
        && number > max
    {
        return Some(FieldError::new(
            &field.id,
            "max",
            format!("Must be at most {max}"),
        ));
    }

    None
}

/// Numeric bounds apply to number-bearing kinds only. Scale kinds fall
/// back to their conventional ranges when the author set none.
fn effective_bounds(field: &FormField) -> (Option<f64>, Option<f64>) {
    let rules = &field.validation;
    match field.field_type {
        FieldType::Rating => (Some(rules.min.unwrap_or(1.0)), Some(rules.max.unwrap_or(5.0))),
        FieldType::OpinionScale => (Some(rules.min.unwrap_or(0.0)), Some(rules.max.unwrap_or(10.0))),
        FieldType::Slider => (Some(rules.min.unwrap_or(0.0)), Some(rules.max.unwrap_or(100.0))),
        _ => (rules.min, rules.max),
    }
}

fn numeric_answer(field_type: FieldType, value: &Value) -> Option<f64> {
    match field_type {
        FieldType::Number | FieldType::Currency => {
            value.as_str().and_then(|text| text.trim().parse::<f64>().ok())
        }
        FieldType::Rating | FieldType::Slider | FieldType::OpinionScale => value.as_f64(),
        _ => None,
    }
}

fn check_single_choice(field: &FormField, value: &Value) -> Option<FieldError> {
    if field.options.is_empty() {
        return None;
    }
    let chosen = value.as_str()?;
    let known = field.options.iter().any(|option| option.value == chosen);
    (!known).then(|| choice_failure(field))
}

fn check_multi_choice(field: &FormField, value: &Value) -> Option<FieldError> {
    if field.options.is_empty() {
        return None;
    }
    let map = value.as_object()?;
    let unknown = map
        .keys()
        .any(|key| !field.options.iter().any(|option| option.value == *key));
    unknown.then(|| choice_failure(field))
}

fn check_ranking(field: &FormField, value: &Value) -> Option<FieldError> {
    let items = value.as_array()?;
    let mut seen = std::collections::HashSet::new();
    for item in items {
        let Some(entry) = item.as_str() else {
            return Some(format_failure(field));
        };
        if !seen.insert(entry) {
            return Some(format_failure(field));
        }
        if !field.options.is_empty()
            && !field.options.iter().any(|option| option.value == entry)
        {
            return Some(choice_failure(field));
        }
    }
    None
}

fn check_date_range(field: &FormField, value: &Value) -> Option<FieldError> {
    let map = value.as_object()?;
    let start = map.get("start").and_then(Value::as_str).and_then(parse_date);
    let end = map.get("end").and_then(Value::as_str).and_then(parse_date);
    match (start, end) {
        (Some(start), Some(end)) if start <= end => None,
        _ => Some(FieldError::new(
            &field.id,
            "format",
            "Please enter a valid date range",
        )),
    }
}

fn text_matches(field: &FormField, value: &Value, pattern: &Regex) -> Option<FieldError> {
    let ok = value.as_str().is_some_and(|text| pattern.is_match(text));
    (!ok).then(|| format_failure(field))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|moment| moment.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn format_failure(field: &FormField) -> FieldError {
    FieldError::new(&field.id, "format", format_message(field.field_type))
}

fn choice_failure(field: &FormField) -> FieldError {
    FieldError::new(
        &field.id,
        "choice",
        "Please select one of the listed options",
    )
}

fn format_message(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Email => "Please enter a valid email address",
        FieldType::Phone => "Please enter a valid phone number",
        FieldType::Url => "Please enter a valid URL",
        FieldType::Number | FieldType::Currency => "Please enter a valid number",
        FieldType::Date => "Please enter a valid date",
        FieldType::Time => "Please enter a valid time",
        FieldType::DateTime => "Please enter a valid date and time",
        FieldType::DateRange => "Please enter a valid date range",
        FieldType::Rating => "Please choose a rating between 1 and 5",
        FieldType::ColorPicker => "Please enter a valid color",
        _ => "This answer is not valid for this field",
    }
}
