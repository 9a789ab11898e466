use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::spec::field::FormField;

/// Ordered group of fields shown together before the respondent advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormPage {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FormField>,
}

impl FormPage {
    /// Creates an empty page with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ids::new_page_id(),
            name: name.into(),
            description: None,
            order: 0,
            fields: Vec::new(),
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == field_id)
    }
}
