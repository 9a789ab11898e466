use serde_json::Value;

use crate::answers::{AnswerMap, display_value};
use crate::contract::{InputContract, input_contract};
use crate::spec::field::FieldOption;
use crate::spec::template::FormTemplate;
use crate::visibility::resolve_visibility;

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub contract: InputContract,
    pub required: bool,
    pub visible: bool,
    pub options: Vec<FieldOption>,
    pub current_value: Option<Value>,
}

/// Snapshot of one page for a host UI or text shell. Pure function of
/// (template, page index, answers).
#[derive(Debug, Clone)]
pub struct PageView {
    pub form_name: String,
    pub page_id: String,
    pub page_name: String,
    pub page_description: Option<String>,
    pub page_index: usize,
    pub page_count: usize,
    pub progress_percent: f32,
    pub fields: Vec<FieldView>,
}

/// Builds the view for one page, resolving visibility against the answers.
#[must_use]
pub fn page_view(template: &FormTemplate, page_index: usize, answers: &AnswerMap) -> Option<PageView> {
    let page = template.pages.get(page_index)?;
    let visibility = resolve_visibility(template, answers);
    let page_count = template.pages.len();

    let fields = page
        .fields
        .iter()
        .map(|field| FieldView {
            id: field.id.clone(),
            label: field.label.clone(),
            description: field.description.clone(),
            placeholder: field.placeholder.clone(),
            contract: input_contract(field.field_type),
            required: field.validation.required,
            visible: visibility.get(&field.id).copied().unwrap_or(true),
            options: field.options.clone(),
            current_value: answers.get(&field.id).cloned(),
        })
        .collect();

    Some(PageView {
        form_name: template.name.clone(),
        page_id: page.id.clone(),
        page_name: page.name.clone(),
        page_description: page.description.clone(),
        page_index,
        page_count,
        progress_percent: (page_index + 1) as f32 / page_count as f32 * 100.0,
        fields,
    })
}

/// Renders the view as human-friendly text for the CLI shell.
#[must_use]
pub fn render_text(view: &PageView) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {}", view.form_name));
    lines.push(format!(
        "Page {}/{}: {} ({:.0}%)",
        view.page_index + 1,
        view.page_count,
        view.page_name,
        view.progress_percent
    ));
    if let Some(description) = &view.page_description {
        lines.push(description.clone());
    }

    for field in view.fields.iter().filter(|field| field.visible) {
        if field.contract == InputContract::Display {
            lines.push(format!("   {}", field.label));
            continue;
        }
        let mut entry = format!(" - {}", field.label);
        if field.required {
            entry.push_str(" [required]");
        }
        if let Some(value) = &field.current_value {
            entry.push_str(&format!(" = {}", display_value(value)));
        }
        lines.push(entry);
        if !field.options.is_empty() {
            let choices: Vec<&str> = field
                .options
                .iter()
                .map(|option| option.label.as_str())
                .collect();
            lines.push(format!("   Choices: {}", choices.join(", ")));
        }
    }

    lines.join("\n")
}
