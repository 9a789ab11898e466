//! Boundaries to the external store. Transport mechanics (HTTP, auth
//! headers) live with the collaborator behind these traits; the engine
//! only exchanges documents.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use formline_spec::{FormSubmission, FormTemplate, ids};
use thiserror::Error;

/// Failure loading a published template by slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Absent or unpublished; the two are indistinguishable to respondents.
    #[error("no published form at '{0}'")]
    NotFound(String),
    /// The store answered with a non-JSON content type.
    #[error("store returned a non-JSON document")]
    NotJson,
    #[error("malformed template document: {0}")]
    Malformed(String),
}

/// Failure delivering a submission document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("submission delivery failed: {0}")]
    Failed(String),
}

/// Read side: resolves a public slug to the full template document.
pub trait TemplateStore {
    fn fetch_published(&self, slug: &str) -> Result<FormTemplate, LoadError>;
}

/// Write side: accepts one completed submission and returns the id the
/// store assigned to it.
pub trait SubmissionSink {
    fn deliver(&self, slug: &str, submission: &FormSubmission) -> Result<String, TransportError>;
}

/// Store used by tests and the CLI. Interior mutability keeps the trait
/// object shareable inside the single-threaded session loop.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    templates: RefCell<HashMap<String, FormTemplate>>,
    submissions: RefCell<Vec<FormSubmission>>,
    fail_next_delivery: Cell<bool>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under its slug; templates without a slug are
    /// not reachable and are ignored.
    pub fn put_template(&self, template: FormTemplate) {
        if let Some(slug) = template.slug.clone() {
            self.templates.borrow_mut().insert(slug, template);
        }
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.submissions.borrow().clone()
    }

    /// Makes the next `deliver` call fail, for transport-retry tests.
    pub fn fail_next_delivery(&self) {
        self.fail_next_delivery.set(true);
    }
}

impl TemplateStore for InMemoryStore {
    fn fetch_published(&self, slug: &str) -> Result<FormTemplate, LoadError> {
        self.templates
            .borrow()
            .get(slug)
            .filter(|template| template.is_published)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(slug.to_string()))
    }
}

impl SubmissionSink for InMemoryStore {
    fn deliver(&self, slug: &str, submission: &FormSubmission) -> Result<String, TransportError> {
        if self.fail_next_delivery.take() {
            return Err(TransportError::Failed("injected delivery failure".into()));
        }
        let id = ids::new_submission_id();
        let mut stored = submission.clone();
        stored.id = Some(id.clone());
        self.submissions.borrow_mut().push(stored);
        if let Some(template) = self.templates.borrow_mut().get_mut(slug) {
            template.submission_count += 1;
        }
        Ok(id)
    }
}
