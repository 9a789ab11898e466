use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::answers::{AnswerMap, display_value, is_empty_answer};
use crate::spec::field::FieldType;
use crate::spec::submission::FormSubmission;
use crate::spec::template::FormTemplate;
use crate::visibility::{VisibilityMap, resolve_visibility};

/// Caller-supplied context so assembly itself stays a pure function.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionMeta {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Builds the submission document from the final answer snapshot.
///
/// Only answerable fields that are visible under the final answers make it
/// into `data`; a stale value lingering for a field hidden by conditional
/// logic is dropped here. Identical input yields byte-identical serialized
/// output.
#[must_use]
pub fn assemble_submission(
    template: &FormTemplate,
    answers: &AnswerMap,
    meta: &SubmissionMeta,
) -> FormSubmission {
    let visibility = resolve_visibility(template, answers);
    let mut data = BTreeMap::new();

    for page in &template.pages {
        let mut page_data = BTreeMap::new();
        for field in &page.fields {
            if !field.field_type.is_answerable() {
                continue;
            }
            if !visibility.get(&field.id).copied().unwrap_or(true) {
                continue;
            }
            if let Some(value) = answers.get(&field.id)
                && !is_empty_answer(value)
            {
                page_data.insert(field.id.clone(), value.clone());
            }
        }
        if !page_data.is_empty() {
            data.insert(page.id.clone(), page_data);
        }
    }

    FormSubmission {
        id: None,
        template_id: template.id.clone(),
        data,
        respondent_email: derive_respondent_email(template, answers, &visibility),
        respondent_name: derive_respondent_name(template, answers, &visibility),
        started_at: meta.started_at,
        completed_at: meta.completed_at,
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
    }
}

/// Best-effort identity heuristic: the first email field (template order)
/// with a non-empty visible answer. Returns `None` rather than failing
/// when no field qualifies.
#[must_use]
pub fn derive_respondent_email(
    template: &FormTemplate,
    answers: &AnswerMap,
    visibility: &VisibilityMap,
) -> Option<String> {
    template
        .fields()
        .filter(|(_, field)| field.field_type == FieldType::Email)
        .filter(|(_, field)| visibility.get(&field.id).copied().unwrap_or(true))
        .find_map(|(_, field)| answered_text(answers.get(&field.id)))
}

/// Best-effort identity heuristic: the first answerable field whose label
/// contains "name" or "username" (case-insensitive) with a non-empty
/// visible scalar answer. Inherited string matching; kept behind this
/// function so a future explicit identity flag can replace it in one
/// place.
#[must_use]
pub fn derive_respondent_name(
    template: &FormTemplate,
    answers: &AnswerMap,
    visibility: &VisibilityMap,
) -> Option<String> {
    template
        .fields()
        .filter(|(_, field)| field.field_type.is_answerable())
        .filter(|(_, field)| {
            let label = field.label.to_lowercase();
            label.contains("name") || label.contains("username")
        })
        .filter(|(_, field)| visibility.get(&field.id).copied().unwrap_or(true))
        .find_map(|(_, field)| answered_text(answers.get(&field.id)))
}

/// Non-empty scalar answers rendered to text; composite answers never
/// qualify as identity values.
fn answered_text(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if is_empty_answer(value) || value.is_array() || value.is_object() {
        return None;
    }
    Some(display_value(value))
}
