use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use formline_spec::{
    AnswerMap, FieldError, FormSubmission, FormTemplate, PageView, SubmissionMeta,
    assemble_submission, page_view, validate_page,
};

use crate::error::EngineError;
use crate::ports::{SubmissionSink, TemplateStore};

/// Batch notice raised once per rejected transition, alongside the
/// per-field messages.
pub const REQUIRED_FIELDS_NOTICE: &str = "Please complete the required fields";

/// Where the respondent currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Informational zeroth state; only exists when the template shows a
    /// cover page.
    Cover,
    Page(usize),
    /// Terminal; every further mutation or transition is rejected.
    Submitted,
}

/// One respondent's pass through a published template.
///
/// The session owns the only mutable answer map, so cross-page conditional
/// rules always evaluate against one coherent snapshot. Everything else
/// (validation, visibility, assembly) is computed from immutable borrows.
pub struct RespondentSession {
    template: FormTemplate,
    state: SessionState,
    answers: AnswerMap,
    page_errors: Vec<FieldError>,
    started_at: DateTime<Utc>,
    client_ip: Option<String>,
    client_user_agent: Option<String>,
}

impl RespondentSession {
    /// Validates document integrity before anything is rendered; a broken
    /// template never reaches the respondent.
    pub fn new(template: FormTemplate) -> Result<Self, EngineError> {
        template.check_integrity()?;
        let state = if template.cover_page.show_cover {
            SessionState::Cover
        } else {
            SessionState::Page(0)
        };
        debug!(form = %template.name, "respondent session opened");
        Ok(Self {
            template,
            state,
            answers: AnswerMap::new(),
            page_errors: Vec::new(),
            started_at: Utc::now(),
            client_ip: None,
            client_user_agent: None,
        })
    }

    /// Loads the template behind a public slug and opens a session on it.
    pub fn open(store: &dyn TemplateStore, slug: &str) -> Result<Self, EngineError> {
        let template = store.fetch_published(slug)?;
        Self::new(template)
    }

    /// Attaches client metadata carried into the submission record.
    #[must_use]
    pub fn with_client(mut self, ip: Option<String>, user_agent: Option<String>) -> Self {
        self.client_ip = ip;
        self.client_user_agent = user_agent;
        self
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Field errors from the last rejected transition on the current page.
    pub fn page_errors(&self) -> &[FieldError] {
        &self.page_errors
    }

    /// Records an answer. The session is the sole writer of the map;
    /// structural fields and unknown ids are rejected rather than stored.
    pub fn set_answer(&mut self, field_id: &str, value: Value) -> Result<(), EngineError> {
        if self.state == SessionState::Submitted {
            return Err(EngineError::Completed);
        }
        let field = self
            .template
            .field(field_id)
            .ok_or_else(|| EngineError::UnknownField(field_id.to_string()))?;
        if !field.field_type.is_answerable() {
            return Err(EngineError::NotAnswerable(field_id.to_string()));
        }
        self.answers.insert(field_id.to_string(), value);
        self.page_errors.retain(|error| error.field_id != field_id);
        Ok(())
    }

    /// Leaves the cover page. No-op when the session is already on a page.
    pub fn start(&mut self) -> Result<SessionState, EngineError> {
        match self.state {
            SessionState::Cover => {
                self.state = SessionState::Page(0);
                debug!("cover dismissed");
                Ok(self.state)
            }
            SessionState::Page(_) => Ok(self.state),
            SessionState::Submitted => Err(EngineError::Completed),
        }
    }

    /// Advances one page, gated by validation of every visible required
    /// field on the current page.
    pub fn next(&mut self) -> Result<SessionState, EngineError> {
        match self.state {
            SessionState::Cover => self.start(),
            SessionState::Page(index) => {
                self.check_current_page(index)?;
                if index + 1 >= self.template.pages.len() {
                    return Err(EngineError::AtLastPage);
                }
                self.page_errors.clear();
                self.state = SessionState::Page(index + 1);
                debug!(page = index + 1, "advanced");
                Ok(self.state)
            }
            SessionState::Submitted => Err(EngineError::Completed),
        }
    }

    /// Steps back one page (to the cover when one exists). Always allowed,
    /// never loses answers; transient errors for the page being left are
    /// cleared.
    pub fn previous(&mut self) -> Result<SessionState, EngineError> {
        match self.state {
            SessionState::Cover => Ok(self.state),
            SessionState::Page(0) => {
                self.page_errors.clear();
                if self.template.cover_page.show_cover {
                    self.state = SessionState::Cover;
                }
                Ok(self.state)
            }
            SessionState::Page(index) => {
                self.page_errors.clear();
                self.state = SessionState::Page(index - 1);
                Ok(self.state)
            }
            SessionState::Submitted => Err(EngineError::Completed),
        }
    }

    /// Validates the final page, assembles the submission document, and
    /// delivers it. Delivery failure leaves the session on the pre-submit
    /// page so the respondent can retry explicitly; success is terminal.
    pub fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<FormSubmission, EngineError> {
        let index = match self.state {
            SessionState::Page(index) => index,
            SessionState::Submitted => return Err(EngineError::Completed),
            SessionState::Cover => return Err(EngineError::NotAtLastPage),
        };
        if index + 1 != self.template.pages.len() {
            return Err(EngineError::NotAtLastPage);
        }
        self.check_current_page(index)?;

        let meta = SubmissionMeta {
            started_at: self.started_at,
            completed_at: Utc::now(),
            ip_address: self.client_ip.clone(),
            user_agent: self.client_user_agent.clone(),
        };
        let mut submission = assemble_submission(&self.template, &self.answers, &meta);
        let slug = self.template.slug.clone().unwrap_or_default();
        let id = sink.deliver(&slug, &submission)?;
        submission.id = Some(id);

        self.page_errors.clear();
        self.state = SessionState::Submitted;
        debug!(form = %self.template.name, "submission delivered");
        Ok(submission)
    }

    /// Completion percentage, defined only while on a page.
    pub fn progress(&self) -> Option<f32> {
        match self.state {
            SessionState::Page(index) => {
                Some((index + 1) as f32 / self.template.pages.len() as f32 * 100.0)
            }
            _ => None,
        }
    }

    /// View payload for the current page; `None` on the cover and after
    /// submission.
    pub fn current_view(&self) -> Option<PageView> {
        match self.state {
            SessionState::Page(index) => page_view(&self.template, index, &self.answers),
            _ => None,
        }
    }

    fn check_current_page(&mut self, index: usize) -> Result<(), EngineError> {
        let Some(page) = self.template.pages.get(index) else {
            return Ok(());
        };
        let report = validate_page(&self.template, &page.id, &self.answers);
        if report.valid {
            return Ok(());
        }
        warn!(
            page = index,
            failures = report.errors.len(),
            "transition rejected by validation"
        );
        self.page_errors = report.errors.clone();
        Err(EngineError::NavigationRejected {
            notice: REQUIRED_FIELDS_NOTICE,
            errors: report.errors,
        })
    }
}
