use thiserror::Error;

/// Fatal document problems caught at load time, before rendering begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIntegrityError {
    #[error("template has no pages")]
    EmptyPageSet,
    #[error("duplicate page id '{0}'")]
    DuplicatePageId(String),
    #[error("duplicate field id '{0}'")]
    DuplicateFieldId(String),
    #[error("field '{field_id}' has a rule referencing unknown field '{source_id}'")]
    DanglingRuleReference { field_id: String, source_id: String },
    #[error("field '{0}' has a rule referencing itself")]
    SelfReference(String),
    #[error("field '{field_id}' has a rule referencing structural field '{source_id}'")]
    StructuralRuleSource { field_id: String, source_id: String },
}

/// Rejected template mutation; the document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("a template must keep at least one page")]
    LastPage,
    #[error("unknown page id '{0}'")]
    UnknownPage(String),
    #[error("unknown field id '{0}'")]
    UnknownField(String),
}
