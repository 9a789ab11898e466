use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{MutationError, SchemaIntegrityError};
use crate::ids;
use crate::spec::field::{FieldType, FormField};
use crate::spec::page::FormPage;

/// Color scheme applied to a rendered form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Presentation theme for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub accent_color: String,
    #[serde(default)]
    pub mode: ThemeMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent_color: "#2563eb".into(),
            mode: ThemeMode::Light,
        }
    }
}

/// Optional informational page shown before the first form page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub show_cover: bool,
}

/// The authored, reusable form definition. This struct is the literal
/// wire/storage format; page and field ids are join keys for conditional
/// rules and submission data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    /// Absent until first persisted by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub cover_page: CoverPage,
    pub pages: Vec<FormPage>,
    #[serde(default)]
    pub is_published: bool,
    /// Assigned on publish; kept on unpublish so re-publishing restores the
    /// same share URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub submission_count: u64,
    #[serde(default)]
    pub view_count: u64,
}

impl FormTemplate {
    /// Creates an unsaved template with one empty page.
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            project_id: project_id.into(),
            name: name.into(),
            description: None,
            theme: Theme::default(),
            cover_page: CoverPage::default(),
            pages: vec![FormPage::new("Page 1")],
            is_published: false,
            slug: None,
            submission_count: 0,
            view_count: 0,
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&FormPage> {
        self.pages.iter().find(|page| page.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == page_id)
    }

    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields().find_map(|(_, field)| (field.id == field_id).then_some(field))
    }

    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut FormField> {
        self.pages
            .iter_mut()
            .flat_map(|page| page.fields.iter_mut())
            .find(|field| field.id == field_id)
    }

    pub fn page_of_field(&self, field_id: &str) -> Option<&FormPage> {
        self.pages.iter().find(|page| page.field(field_id).is_some())
    }

    /// All fields in template order (page order, then field order).
    pub fn fields(&self) -> impl Iterator<Item = (&FormPage, &FormField)> {
        self.pages
            .iter()
            .flat_map(|page| page.fields.iter().map(move |field| (page, field)))
    }

    /// Appends an empty page and returns its id.
    pub fn add_page(&mut self, name: impl Into<String>) -> String {
        let page = FormPage::new(name);
        let id = page.id.clone();
        self.pages.push(page);
        self.renumber();
        id
    }

    /// Removes a page and every conditional rule referencing its fields.
    /// Removing the last page is rejected: a template always keeps at
    /// least one page.
    pub fn remove_page(&mut self, page_id: &str) -> Result<(), MutationError> {
        let index = self
            .page_index(page_id)
            .ok_or_else(|| MutationError::UnknownPage(page_id.to_string()))?;
        if self.pages.len() == 1 {
            return Err(MutationError::LastPage);
        }
        let removed = self.pages.remove(index);
        let removed_ids: Vec<String> = removed.fields.iter().map(|field| field.id.clone()).collect();
        self.strip_rules_referencing(&removed_ids);
        self.renumber();
        Ok(())
    }

    pub fn move_page(&mut self, page_id: &str, to_index: usize) -> Result<(), MutationError> {
        let index = self
            .page_index(page_id)
            .ok_or_else(|| MutationError::UnknownPage(page_id.to_string()))?;
        let page = self.pages.remove(index);
        let target = to_index.min(self.pages.len());
        self.pages.insert(target, page);
        self.renumber();
        Ok(())
    }

    pub fn rename_page(&mut self, page_id: &str, name: impl Into<String>) -> Result<(), MutationError> {
        let index = self
            .page_index(page_id)
            .ok_or_else(|| MutationError::UnknownPage(page_id.to_string()))?;
        self.pages[index].name = name.into();
        Ok(())
    }

    /// Appends a field to a page and returns the new field id.
    pub fn add_field(
        &mut self,
        page_id: &str,
        field_type: FieldType,
        label: impl Into<String>,
    ) -> Result<String, MutationError> {
        let index = self
            .page_index(page_id)
            .ok_or_else(|| MutationError::UnknownPage(page_id.to_string()))?;
        let field = FormField::new(field_type, label);
        let id = field.id.clone();
        self.pages[index].fields.push(field);
        self.renumber();
        Ok(id)
    }

    /// Removes a field and cascades removal of every conditional rule
    /// elsewhere in the template that referenced it, so a saved document
    /// never carries dangling references.
    pub fn remove_field(&mut self, field_id: &str) -> Result<(), MutationError> {
        let mut found = false;
        for page in &mut self.pages {
            let before = page.fields.len();
            page.fields.retain(|field| field.id != field_id);
            found |= page.fields.len() != before;
        }
        if !found {
            return Err(MutationError::UnknownField(field_id.to_string()));
        }
        self.strip_rules_referencing(std::slice::from_ref(&field_id.to_string()));
        self.renumber();
        Ok(())
    }

    /// Repositions a field within its page.
    pub fn move_field(&mut self, field_id: &str, to_index: usize) -> Result<(), MutationError> {
        for page in &mut self.pages {
            if let Some(index) = page.fields.iter().position(|field| field.id == field_id) {
                let field = page.fields.remove(index);
                let target = to_index.min(page.fields.len());
                page.fields.insert(target, field);
                self.renumber();
                return Ok(());
            }
        }
        Err(MutationError::UnknownField(field_id.to_string()))
    }

    /// Inserts a copy of the field directly after the original and returns
    /// the copy's id. The copy gets a fresh id and a "(Copy)" label suffix.
    pub fn duplicate_field(&mut self, field_id: &str) -> Result<String, MutationError> {
        for page in &mut self.pages {
            if let Some(index) = page.fields.iter().position(|field| field.id == field_id) {
                let copy = page.fields[index].duplicate();
                let id = copy.id.clone();
                page.fields.insert(index + 1, copy);
                self.renumber();
                return Ok(id);
            }
        }
        Err(MutationError::UnknownField(field_id.to_string()))
    }

    /// Marks the template as published under the given slug. Integrity is
    /// checked first so respondents never load a broken document.
    pub fn publish(&mut self, slug: impl Into<String>) -> Result<(), SchemaIntegrityError> {
        self.check_integrity()?;
        self.slug = Some(slug.into());
        self.is_published = true;
        Ok(())
    }

    pub fn unpublish(&mut self) {
        self.is_published = false;
    }

    /// Load-time gate: structural problems are surfaced here, before any
    /// rendering begins, instead of crashing evaluators later.
    pub fn check_integrity(&self) -> Result<(), SchemaIntegrityError> {
        if self.pages.is_empty() {
            return Err(SchemaIntegrityError::EmptyPageSet);
        }

        let mut page_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(SchemaIntegrityError::DuplicatePageId(page.id.clone()));
            }
        }

        let mut field_ids = HashSet::new();
        for (_, field) in self.fields() {
            if !field_ids.insert(field.id.as_str()) {
                return Err(SchemaIntegrityError::DuplicateFieldId(field.id.clone()));
            }
        }

        for (_, field) in self.fields() {
            for rule in &field.conditional_logic {
                if rule.field_id == field.id {
                    return Err(SchemaIntegrityError::SelfReference(field.id.clone()));
                }
                match self.field(&rule.field_id) {
                    None => {
                        return Err(SchemaIntegrityError::DanglingRuleReference {
                            field_id: field.id.clone(),
                            source_id: rule.field_id.clone(),
                        });
                    }
                    Some(source) if source.field_type.is_structural() => {
                        return Err(SchemaIntegrityError::StructuralRuleSource {
                            field_id: field.id.clone(),
                            source_id: rule.field_id.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Keeps `order` dense and matching position after every mutation.
    fn renumber(&mut self) {
        for (page_index, page) in self.pages.iter_mut().enumerate() {
            page.order = page_index;
            for (field_index, field) in page.fields.iter_mut().enumerate() {
                field.order = field_index;
            }
        }
    }

    fn strip_rules_referencing(&mut self, removed: &[String]) {
        for page in &mut self.pages {
            for field in &mut page.fields {
                field
                    .conditional_logic
                    .retain(|rule| !removed.iter().any(|id| *id == rule.field_id));
            }
        }
    }

    /// Ensures a persisted id, generating one for first-save documents.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.is_none() {
            self.id = Some(ids::new_template_id());
        }
        self.id.as_deref().unwrap_or_default()
    }
}
