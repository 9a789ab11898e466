use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::ConditionRule;
use crate::ids;

/// Closed set of field kinds a template may contain.
///
/// Structural kinds (heading, paragraph, banner, divider, image, video)
/// carry no answer and are exempt from validation and visibility gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    ShortText,
    LongText,
    Email,
    Phone,
    Url,
    Password,
    Number,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    PictureChoice,
    Date,
    Time,
    DateTime,
    DateRange,
    Rating,
    Ranking,
    Slider,
    OpinionScale,
    FileUpload,
    Signature,
    ColorPicker,
    Location,
    Address,
    Currency,
    Heading,
    Paragraph,
    Banner,
    Divider,
    Image,
    Video,
    /// Kinds written by newer builds; rendered as a plain text input.
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Display-only kinds that never hold an answer.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FieldType::Heading
                | FieldType::Paragraph
                | FieldType::Banner
                | FieldType::Divider
                | FieldType::Image
                | FieldType::Video
        )
    }

    /// Kinds that collect a value from the respondent.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        !self.is_structural()
    }

    /// Kinds whose answers are constrained to the field's option list.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::MultipleChoice
                | FieldType::Checkboxes
                | FieldType::Dropdown
                | FieldType::PictureChoice
                | FieldType::Ranking
        )
    }
}

/// Declarative constraints attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Creates an option with a fresh id.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: ids::new_option_id(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One question, input, or display unit inside a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_logic: Vec<ConditionRule>,
}

impl FormField {
    /// Creates a field with a fresh id and default validation.
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: ids::new_field_id(),
            field_type,
            label: label.into(),
            placeholder: None,
            description: None,
            order: 0,
            validation: ValidationRules::default(),
            options: Vec::new(),
            conditional_logic: Vec::new(),
        }
    }

    /// Copy of this field under a fresh id, suitable for insertion next to
    /// the original. Options get fresh ids too; conditional rules keep their
    /// source references.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ids::new_field_id();
        copy.label = format!("{} (Copy)", self.label);
        for option in &mut copy.options {
            option.id = ids::new_option_id();
        }
        copy
    }
}
