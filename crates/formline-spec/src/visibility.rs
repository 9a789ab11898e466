use std::collections::BTreeMap;

use crate::answers::AnswerMap;
use crate::condition::ConditionRule;
use crate::spec::field::FormField;
use crate::spec::template::FormTemplate;

pub type VisibilityMap = BTreeMap<String, bool>;

/// Resolves per-field visibility for the whole template against one answer
/// snapshot. A field with no rules is visible; a field with rules is
/// visible only while every rule matches. Structural fields are always
/// visible.
///
/// Rules whose source is unanswered, missing, structural, or itself hidden
/// evaluate to non-matching, so dangling chains settle on hidden instead
/// of crashing the navigator. Chained references are resolved by iterating
/// to a fixpoint; hiding only propagates, so the loop is bounded by the
/// field count.
#[must_use]
pub fn resolve_visibility(template: &FormTemplate, answers: &AnswerMap) -> VisibilityMap {
    let mut map: VisibilityMap = template
        .fields()
        .map(|(_, field)| (field.id.clone(), true))
        .collect();

    for _ in 0..map.len().max(1) {
        let mut changed = false;
        for (_, field) in template.fields() {
            let visible = field_visible(template, field, answers, &map);
            if let Some(entry) = map.get_mut(&field.id)
                && *entry != visible
            {
                *entry = visible;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    map
}

/// Convenience probe for a single field.
#[must_use]
pub fn is_visible(template: &FormTemplate, field: &FormField, answers: &AnswerMap) -> bool {
    resolve_visibility(template, answers)
        .get(&field.id)
        .copied()
        .unwrap_or(true)
}

fn field_visible(
    template: &FormTemplate,
    field: &FormField,
    answers: &AnswerMap,
    resolved: &VisibilityMap,
) -> bool {
    if field.field_type.is_structural() || field.conditional_logic.is_empty() {
        return true;
    }
    field
        .conditional_logic
        .iter()
        .all(|rule| source_visible(template, resolved, rule) && rule.matches(answers.get(&rule.field_id)))
}

/// A hidden, missing, or structural source never satisfies a rule.
fn source_visible(template: &FormTemplate, resolved: &VisibilityMap, rule: &ConditionRule) -> bool {
    match template.field(&rule.field_id) {
        Some(source) if source.field_type.is_answerable() => {
            resolved.get(&rule.field_id).copied().unwrap_or(false)
        }
        _ => false,
    }
}
