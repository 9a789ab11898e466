use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied to the referenced field's current answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
}

/// Visibility rule: the owning field is shown only while the referenced
/// field's answer satisfies the comparison. Multiple rules on one field
/// combine conjunctively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub field_id: String,
    pub operator: ConditionOperator,
    pub value: Value,
}

impl ConditionRule {
    pub fn new(field_id: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value,
        }
    }

    /// Evaluates the rule against the source field's answer. A missing or
    /// null answer never matches, so dependents of unanswered fields stay
    /// hidden instead of erroring.
    #[must_use]
    pub fn matches(&self, answer: Option<&Value>) -> bool {
        let Some(value) = answer else {
            return false;
        };
        if value.is_null() {
            return false;
        }
        match self.operator {
            ConditionOperator::Equals => loose_eq(value, &self.value),
            ConditionOperator::NotEquals => !loose_eq(value, &self.value),
            ConditionOperator::Contains => contains(value, &self.value),
            ConditionOperator::NotContains => !contains(value, &self.value),
            ConditionOperator::GreaterThan => {
                matches!(compare(value, &self.value), Some(Ordering::Greater))
            }
            ConditionOperator::LessThan => {
                matches!(compare(value, &self.value), Some(Ordering::Less))
            }
        }
    }
}

/// Scalar answers compare loosely (numeric strings equal their numbers);
/// multi-select answers match when the expected value is selected.
fn loose_eq(answer: &Value, expected: &Value) -> bool {
    match answer {
        Value::Array(items) => items.iter().any(|item| scalar_eq(item, expected)),
        Value::Object(map) => expected.as_str().is_some_and(|key| {
            map.get(key).and_then(Value::as_bool).unwrap_or(false)
        }),
        _ => scalar_eq(answer, expected),
    }
}

fn scalar_eq(a: &Value, b: &Value) -> bool {
    if let (Some(left), Some(right)) = (numeric(a), numeric(b)) {
        return left == right;
    }
    match (a, b) {
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        _ => a == b,
    }
}

fn contains(answer: &Value, expected: &Value) -> bool {
    match answer {
        Value::String(text) => expected
            .as_str()
            .is_some_and(|needle| text.contains(needle)),
        Value::Array(_) | Value::Object(_) => loose_eq(answer, expected),
        _ => false,
    }
}

/// Ordering comparisons are numeric only; anything non-numeric never matches.
fn compare(answer: &Value, expected: &Value) -> Option<Ordering> {
    let left = numeric(answer)?;
    let right = numeric(expected)?;
    left.partial_cmp(&right)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(operator: ConditionOperator, value: Value) -> ConditionRule {
        ConditionRule::new("source", operator, value)
    }

    #[test]
    fn unanswered_source_never_matches() {
        let eq = rule(ConditionOperator::Equals, json!("yes"));
        assert!(!eq.matches(None));
        assert!(!eq.matches(Some(&Value::Null)));

        let neq = rule(ConditionOperator::NotEquals, json!("yes"));
        assert!(!neq.matches(None));
    }

    #[test]
    fn equals_compares_numbers_loosely() {
        let r = rule(ConditionOperator::Equals, json!(5));
        assert!(r.matches(Some(&json!("5"))));
        assert!(r.matches(Some(&json!(5.0))));
        assert!(!r.matches(Some(&json!("6"))));
    }

    #[test]
    fn equals_checks_membership_on_multi_select() {
        let r = rule(ConditionOperator::Equals, json!("blue"));
        assert!(r.matches(Some(&json!({"blue": true, "red": false}))));
        assert!(!r.matches(Some(&json!({"blue": false}))));
        assert!(r.matches(Some(&json!(["red", "blue"]))));
    }

    #[test]
    fn contains_is_substring_on_strings() {
        let r = rule(ConditionOperator::Contains, json!("corp"));
        assert!(r.matches(Some(&json!("acme corporation"))));
        assert!(!r.matches(Some(&json!("acme"))));
    }

    #[test]
    fn ordering_requires_numbers_on_both_sides() {
        let r = rule(ConditionOperator::GreaterThan, json!(10));
        assert!(r.matches(Some(&json!("11"))));
        assert!(!r.matches(Some(&json!("9"))));
        assert!(!r.matches(Some(&json!("many"))));
    }
}
