pub mod field;
pub mod page;
pub mod submission;
pub mod template;

pub use field::{FieldOption, FieldType, FormField, ValidationRules};
pub use page::FormPage;
pub use submission::FormSubmission;
pub use template::{CoverPage, FormTemplate, Theme, ThemeMode};
