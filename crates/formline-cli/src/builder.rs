use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use formline_spec::{
    AnswerMap, ConditionOperator, ConditionRule, CoverPage, FieldOption, FieldType, FormField,
    FormPage, FormTemplate, ValidationRules, answers_schema, example_answers, ids,
    resolve_visibility,
};

/// Input shape describing the template to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default = "default_project")]
    pub project_id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// When present the template is published under this slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Bundle directory name; defaults to a sanitized slug or name.
    #[serde(default)]
    pub dir_name: Option<String>,
    #[serde(default)]
    pub cover: Option<CoverInput>,
    #[serde(default)]
    pub pages: Vec<PageInput>,
}

fn default_project() -> String {
    "local".into()
}

/// Optional cover page metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One page of the generated template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldInput>,
}

/// Field metadata collected from CLI interactions or JSON inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldInput {
    /// Author-chosen id, kept verbatim so conditions can reference it;
    /// generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub options: Vec<OptionInput>,
    #[serde(default)]
    pub conditions: Vec<RuleInput>,
}

/// Options accept either a bare label or an explicit label/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionInput {
    Label(String),
    Full { label: String, value: String },
}

/// Visibility condition referencing another field's declared id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInput {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: Value,
}

/// Generated bundle returned by the builder.
#[derive(Debug)]
pub struct GeneratedBundle {
    pub template: FormTemplate,
    pub schema: Value,
    pub examples: Value,
}

/// Build the full bundle from CLI inputs or a JSON description.
pub fn build_bundle(input: &TemplateInput) -> Result<GeneratedBundle, String> {
    let template = build_template(input)?;
    let answers = AnswerMap::new();
    let visibility = resolve_visibility(&template, &answers);
    let schema = answers_schema(&template, &visibility);
    let examples = example_answers(&template, &visibility);
    Ok(GeneratedBundle {
        template,
        schema,
        examples,
    })
}

/// Builds and integrity-checks the template described by the input.
pub fn build_template(input: &TemplateInput) -> Result<FormTemplate, String> {
    validate_input(input)?;

    let mut template = FormTemplate::new(input.project_id.clone(), input.name.clone());
    template.description = input.description.clone();
    if let Some(cover) = &input.cover {
        template.cover_page = CoverPage {
            title: cover.title.clone(),
            description: cover.description.clone(),
            image_url: cover.image_url.clone(),
            show_cover: true,
        };
    }
    template.pages = input
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| build_page(index, page))
        .collect();

    template
        .check_integrity()
        .map_err(|error| error.to_string())?;

    if let Some(slug) = &input.slug {
        template
            .publish(slug.clone())
            .map_err(|error| error.to_string())?;
    }

    Ok(template)
}

fn build_page(index: usize, input: &PageInput) -> FormPage {
    let mut page = FormPage::new(input.name.clone());
    page.description = input.description.clone();
    page.order = index;
    page.fields = input
        .fields
        .iter()
        .enumerate()
        .map(|(position, field)| build_field(position, field))
        .collect();
    page
}

fn build_field(position: usize, input: &FieldInput) -> FormField {
    let mut field = FormField::new(input.field_type, input.label.clone());
    if let Some(id) = &input.id {
        field.id = id.clone();
    }
    field.placeholder = input.placeholder.clone();
    field.description = input.description.clone();
    field.order = position;
    field.validation = ValidationRules {
        required: input.required,
        min_length: input.min_length,
        max_length: input.max_length,
        pattern: input.pattern.clone(),
        min: input.min,
        max: input.max,
    };
    field.options = input.options.iter().map(build_option).collect();
    field.conditional_logic = input
        .conditions
        .iter()
        .map(|rule| ConditionRule::new(rule.field.clone(), rule.operator, rule.value.clone()))
        .collect();
    field
}

fn build_option(input: &OptionInput) -> FieldOption {
    match input {
        OptionInput::Label(label) => {
            let value = slugify(label);
            FieldOption::new(label.clone(), value)
        }
        OptionInput::Full { label, value } => FieldOption::new(label.clone(), value.clone()),
    }
}

fn validate_input(input: &TemplateInput) -> Result<(), String> {
    if input.name.trim().is_empty() {
        return Err("template name must be provided".into());
    }
    if input.pages.is_empty() {
        return Err("at least one page must be defined".into());
    }

    let mut seen = HashSet::new();
    let declared: HashSet<&str> = input
        .pages
        .iter()
        .flat_map(|page| page.fields.iter())
        .filter_map(|field| field.id.as_deref())
        .collect();

    for page in &input.pages {
        if page.name.trim().is_empty() {
            return Err("page name cannot be empty".into());
        }
        for field in &page.fields {
            if field.label.trim().is_empty() {
                return Err("field label cannot be empty".into());
            }
            if let Some(id) = &field.id {
                if id.trim().is_empty() {
                    return Err("field id cannot be empty".into());
                }
                if !seen.insert(id.clone()) {
                    return Err(format!("duplicate field id '{id}'"));
                }
            }
            if field.field_type.is_choice() && field.options.is_empty() {
                return Err(format!(
                    "choice field '{}' must include options",
                    field.label
                ));
            }
            if let (Some(min), Some(max)) = (field.min, field.max)
                && min > max
            {
                return Err(format!("field '{}' min cannot exceed max", field.label));
            }
            if let (Some(min_length), Some(max_length)) = (field.min_length, field.max_length)
                && min_length > max_length
            {
                return Err(format!(
                    "field '{}' minLength cannot exceed maxLength",
                    field.label
                ));
            }
            for rule in &field.conditions {
                if Some(rule.field.as_str()) == field.id.as_deref() {
                    return Err(format!(
                        "field '{}' has a condition referencing itself",
                        field.label
                    ));
                }
                if !declared.contains(rule.field.as_str()) {
                    return Err(format!(
                        "field '{}' has a condition referencing unknown field '{}'",
                        field.label, rule.field
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Directory a bundle for this input would land in.
pub fn bundle_dir(input: &TemplateInput, out_root: &Path) -> PathBuf {
    out_root.join(
        input
            .dir_name
            .clone()
            .unwrap_or_else(|| bundle_base_name(input)),
    )
}

/// Serialize the bundle to disk and return the bundle directory.
pub fn write_bundle(
    bundle: &GeneratedBundle,
    input: &TemplateInput,
    out_root: &Path,
) -> io::Result<PathBuf> {
    let base = bundle_base_name(input);
    let bundle_dir = bundle_dir(input, out_root);
    let forms_dir = bundle_dir.join("forms");
    let schemas_dir = bundle_dir.join("schemas");
    let samples_dir = bundle_dir.join("samples");

    fs::create_dir_all(&forms_dir)?;
    fs::create_dir_all(&schemas_dir)?;
    fs::create_dir_all(&samples_dir)?;

    write_json(&forms_dir.join(format!("{base}.form.json")), &bundle.template)?;
    write_json(
        &schemas_dir.join(format!("{base}.answers.schema.json")),
        &bundle.schema,
    )?;
    write_json(
        &samples_dir.join(format!("{base}.answers.example.json")),
        &bundle.examples,
    )?;
    fs::write(bundle_dir.join("README.md"), build_readme(bundle, &base))?;

    Ok(bundle_dir)
}

fn bundle_base_name(input: &TemplateInput) -> String {
    let raw = input.slug.as_deref().unwrap_or(&input.name);
    sanitize_file_name(raw)
}

fn sanitize_file_name(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "bundle".into()
    } else {
        cleaned.to_lowercase()
    }
}

fn slugify(label: &str) -> String {
    let cleaned = sanitize_file_name(label.trim());
    if cleaned == "bundle" && label.trim().is_empty() {
        ids::new_option_id()
    } else {
        cleaned
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, contents)
}

fn build_readme(bundle: &GeneratedBundle, base: &str) -> String {
    let description = bundle
        .template
        .description
        .as_deref()
        .unwrap_or("No description provided.");
    format!(
        "# {title}\n\n{description}\n\n## Files\n\n- `forms/{base}.form.json`\n- `schemas/{base}.answers.schema.json`\n- `samples/{base}.answers.example.json`\n\nValidate collected answers with:\n\n```\nformline validate --template forms/{base}.form.json --answers <answers.json>\n```\n",
        title = bundle.template.name,
        description = description,
        base = base,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn minimal_input() -> TemplateInput {
        serde_json::from_value(json!({
            "name": "Customer Survey",
            "pages": [
                {
                    "name": "Contact",
                    "fields": [
                        { "id": "email", "type": "email", "label": "Work email", "required": true },
                        {
                            "id": "channel",
                            "type": "dropdown",
                            "label": "How did you hear about us?",
                            "options": ["Search", "Referral"]
                        }
                    ]
                }
            ]
        }))
        .expect("input deserializes")
    }

    #[test]
    fn builds_a_template_that_passes_integrity() {
        let bundle = build_bundle(&minimal_input()).expect("bundle builds");
        assert_eq!(bundle.template.pages.len(), 1);
        assert!(bundle.template.check_integrity().is_ok());
        let properties = bundle.schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("email"));
    }

    #[test]
    fn bare_option_labels_get_slug_values() {
        let bundle = build_bundle(&minimal_input()).expect("bundle builds");
        let field = bundle.template.field("channel").expect("channel field");
        assert_eq!(field.options[0].value, "search");
    }

    #[test]
    fn rejects_duplicate_field_ids() {
        let mut input = minimal_input();
        input.pages[0].fields[1].id = Some("email".into());
        assert!(build_bundle(&input).unwrap_err().contains("duplicate"));
    }

    #[test]
    fn rejects_choice_fields_without_options() {
        let mut input = minimal_input();
        input.pages[0].fields[1].options.clear();
        assert!(build_bundle(&input).unwrap_err().contains("options"));
    }

    #[test]
    fn rejects_conditions_on_undeclared_fields() {
        let mut input = minimal_input();
        input.pages[0].fields[0].conditions.push(RuleInput {
            field: "missing".into(),
            operator: ConditionOperator::Equals,
            value: json!("x"),
        });
        assert!(build_bundle(&input).unwrap_err().contains("unknown field"));
    }

    #[test]
    fn slug_input_publishes_the_template() {
        let mut input = minimal_input();
        input.slug = Some("customer-survey".into());
        let bundle = build_bundle(&input).expect("bundle builds");
        assert!(bundle.template.is_published);
        assert_eq!(bundle.template.slug.as_deref(), Some("customer-survey"));
    }

    #[test]
    fn write_bundle_emits_all_artifacts() {
        let input = minimal_input();
        let bundle = build_bundle(&input).expect("bundle builds");
        let out = TempDir::new().expect("temp dir");

        let dir = write_bundle(&bundle, &input, out.path()).expect("bundle writes");

        assert!(dir.join("forms/customer-survey.form.json").exists());
        assert!(dir.join("schemas/customer-survey.answers.schema.json").exists());
        assert!(dir.join("samples/customer-survey.answers.example.json").exists());
        assert!(dir.join("README.md").exists());
    }
}
