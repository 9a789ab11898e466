#![allow(missing_docs)]

pub mod answers;
pub mod answers_schema;
pub mod condition;
pub mod contract;
pub mod error;
pub mod examples;
pub mod ids;
pub mod preview;
pub mod spec;
pub mod submit;
pub mod validate;
pub mod visibility;

pub use answers::{AnswerMap, FieldError, ValidationReport, display_value, is_empty_answer};
pub use answers_schema::generate as answers_schema;
pub use condition::{ConditionOperator, ConditionRule};
pub use contract::{InputContract, ValueShape, input_contract};
pub use error::{MutationError, SchemaIntegrityError};
pub use examples::generate as example_answers;
pub use preview::{FieldView, PageView, page_view, render_text};
pub use spec::{
    CoverPage, FieldOption, FieldType, FormField, FormPage, FormSubmission, FormTemplate, Theme,
    ThemeMode, ValidationRules,
};
pub use submit::{
    SubmissionMeta, assemble_submission, derive_respondent_email, derive_respondent_name,
};
pub use validate::{validate_field, validate_page};
pub use visibility::{VisibilityMap, is_visible, resolve_visibility};
