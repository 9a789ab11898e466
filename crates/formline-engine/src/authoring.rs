use std::time::Instant;

use tracing::debug;

use formline_spec::{
    FieldType, FormField, FormPage, FormTemplate, MutationError, SchemaIntegrityError,
};

use crate::autosave::AutosaveTimer;

/// Editing session for one author: wraps the template, tracks which page
/// the author is looking at, and debounces persistence. Every mutation
/// goes through the template's validated operations, so the document in
/// memory is always saveable.
pub struct AuthoringSession {
    template: FormTemplate,
    active_page: usize,
    autosave: AutosaveTimer,
}

impl AuthoringSession {
    #[must_use]
    pub fn new(template: FormTemplate) -> Self {
        Self::with_timer(template, AutosaveTimer::default())
    }

    #[must_use]
    pub fn with_timer(template: FormTemplate, autosave: AutosaveTimer) -> Self {
        Self {
            template,
            active_page: 0,
            autosave,
        }
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    #[must_use]
    pub fn into_template(self) -> FormTemplate {
        self.template
    }

    pub fn active_page_index(&self) -> usize {
        self.active_page
    }

    pub fn active_page(&self) -> &FormPage {
        // The pointer is re-clamped on every removal, so this never dangles.
        &self.template.pages[self.active_page.min(self.template.pages.len() - 1)]
    }

    pub fn select_page(&mut self, index: usize) {
        self.active_page = index.min(self.template.pages.len() - 1);
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.template.description = description;
        self.touch();
    }

    /// Appends a page and moves the author onto it.
    pub fn add_page(&mut self, name: &str) -> String {
        let id = self.template.add_page(name);
        self.active_page = self.template.pages.len() - 1;
        self.touch();
        id
    }

    /// Removes a page; the active-page pointer lands on the nearest valid
    /// page. Removing the last page is rejected by the template.
    pub fn remove_page(&mut self, page_id: &str) -> Result<(), MutationError> {
        let removed = self
            .template
            .page_index(page_id)
            .ok_or_else(|| MutationError::UnknownPage(page_id.to_string()))?;
        self.template.remove_page(page_id)?;
        if removed < self.active_page {
            self.active_page -= 1;
        }
        self.active_page = self.active_page.min(self.template.pages.len() - 1);
        self.touch();
        Ok(())
    }

    pub fn move_page(&mut self, page_id: &str, to_index: usize) -> Result<(), MutationError> {
        self.template.move_page(page_id, to_index)?;
        self.touch();
        Ok(())
    }

    pub fn rename_page(&mut self, page_id: &str, name: &str) -> Result<(), MutationError> {
        self.template.rename_page(page_id, name)?;
        self.touch();
        Ok(())
    }

    /// Adds a field to the active page.
    pub fn add_field(&mut self, field_type: FieldType, label: &str) -> Result<String, MutationError> {
        let page_id = self.active_page().id.clone();
        let id = self.template.add_field(&page_id, field_type, label)?;
        self.touch();
        Ok(id)
    }

    pub fn remove_field(&mut self, field_id: &str) -> Result<(), MutationError> {
        self.template.remove_field(field_id)?;
        self.touch();
        Ok(())
    }

    pub fn move_field(&mut self, field_id: &str, to_index: usize) -> Result<(), MutationError> {
        self.template.move_field(field_id, to_index)?;
        self.touch();
        Ok(())
    }

    pub fn duplicate_field(&mut self, field_id: &str) -> Result<String, MutationError> {
        let id = self.template.duplicate_field(field_id)?;
        self.touch();
        Ok(id)
    }

    /// In-place edit of label, placeholder, validation, options, or logic.
    pub fn edit_field(
        &mut self,
        field_id: &str,
        edit: impl FnOnce(&mut FormField),
    ) -> Result<(), MutationError> {
        let field = self
            .template
            .field_mut(field_id)
            .ok_or_else(|| MutationError::UnknownField(field_id.to_string()))?;
        edit(field);
        self.touch();
        Ok(())
    }

    pub fn publish(&mut self, slug: impl Into<String>) -> Result<(), SchemaIntegrityError> {
        self.template.publish(slug)?;
        self.touch();
        Ok(())
    }

    pub fn unpublish(&mut self) {
        self.template.unpublish();
        self.touch();
    }

    /// True exactly once per elapsed quiet period; the caller persists the
    /// template and calls back on failure only via the next edit's
    /// debounce cycle.
    pub fn autosave_due(&mut self, now: Instant) -> bool {
        self.autosave.take_due(now)
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    fn touch(&mut self) {
        self.autosave.note_edit(Instant::now());
        debug!(form = %self.template.name, "template edited");
    }
}
