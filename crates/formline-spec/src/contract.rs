use serde::Serialize;
use serde_json::Value;

use crate::spec::field::FieldType;

/// Input contract a host control must satisfy for a field kind: which
/// widget family to mount and which JSON shape the answer takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputContract {
    /// Single-line text entry.
    Text,
    /// Multi-line text entry.
    TextArea,
    /// Masked text entry.
    SecretText,
    /// Text entry holding a decimal number.
    NumericText,
    /// Exactly one option value.
    SingleChoice,
    /// Option value to checked-flag map.
    MultiChoice,
    /// 1-5 star integer.
    Rating,
    /// Integer on a bounded scale.
    Scale,
    /// Ordered list of option values.
    Ranking,
    DateInput,
    TimeInput,
    DateTimeInput,
    /// `{ "start": date, "end": date }` object.
    DateRange,
    /// Reference (URL or storage key) to an uploaded file.
    FileRef,
    /// Reference to a captured signature.
    Signature,
    /// `#rrggbb` string.
    ColorValue,
    /// Structural content; no value is collected.
    Display,
}

/// Coarse JSON shape the validator's type check enforces per contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text,
    Integer,
    OptionValue,
    BoolMap,
    ValueList,
    RangeObject,
    NoValue,
}

/// Maps every field kind to its input contract. The match is exhaustive:
/// adding a `FieldType` variant fails compilation here and in the
/// validator until both are taught about it. Kinds newer than this build
/// degrade to a plain text input instead of erroring.
#[must_use]
pub fn input_contract(field_type: FieldType) -> InputContract {
    match field_type {
        FieldType::ShortText
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Url
        | FieldType::Location
        | FieldType::Address => InputContract::Text,
        FieldType::LongText => InputContract::TextArea,
        FieldType::Password => InputContract::SecretText,
        FieldType::Number | FieldType::Currency => InputContract::NumericText,
        FieldType::MultipleChoice | FieldType::Dropdown | FieldType::PictureChoice => {
            InputContract::SingleChoice
        }
        FieldType::Checkboxes => InputContract::MultiChoice,
        FieldType::Rating => InputContract::Rating,
        FieldType::Slider | FieldType::OpinionScale => InputContract::Scale,
        FieldType::Ranking => InputContract::Ranking,
        FieldType::Date => InputContract::DateInput,
        FieldType::Time => InputContract::TimeInput,
        FieldType::DateTime => InputContract::DateTimeInput,
        FieldType::DateRange => InputContract::DateRange,
        FieldType::FileUpload => InputContract::FileRef,
        FieldType::Signature => InputContract::Signature,
        FieldType::ColorPicker => InputContract::ColorValue,
        FieldType::Heading
        | FieldType::Paragraph
        | FieldType::Banner
        | FieldType::Divider
        | FieldType::Image
        | FieldType::Video => InputContract::Display,
        FieldType::Unknown => InputContract::Text,
    }
}

impl InputContract {
    #[must_use]
    pub fn value_shape(&self) -> ValueShape {
        match self {
            InputContract::Text
            | InputContract::TextArea
            | InputContract::SecretText
            | InputContract::NumericText
            | InputContract::DateInput
            | InputContract::TimeInput
            | InputContract::DateTimeInput
            | InputContract::FileRef
            | InputContract::Signature
            | InputContract::ColorValue => ValueShape::Text,
            InputContract::SingleChoice => ValueShape::OptionValue,
            InputContract::MultiChoice => ValueShape::BoolMap,
            InputContract::Rating | InputContract::Scale => ValueShape::Integer,
            InputContract::Ranking => ValueShape::ValueList,
            InputContract::DateRange => ValueShape::RangeObject,
            InputContract::Display => ValueShape::NoValue,
        }
    }

    /// Coarse shape check; per-kind format rules run in the validator.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self.value_shape() {
            ValueShape::Text | ValueShape::OptionValue => value.is_string(),
            ValueShape::Integer => value.as_i64().is_some(),
            ValueShape::BoolMap => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_boolean)),
            ValueShape::ValueList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ValueShape::RangeObject => value.is_object(),
            ValueShape::NoValue => false,
        }
    }
}
