pub mod builder;

mod wizard;

use builder::{FieldInput, OptionInput, PageInput, TemplateInput, build_bundle, write_bundle};
use clap::{Parser, Subcommand};
use formline_engine::{EngineError, InMemoryStore, RespondentSession, SessionState};
use formline_spec::{
    AnswerMap, FieldType, FieldView, FormTemplate, InputContract, PageView, page_view,
    render_text as render_page_text, validate_page,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use wizard::{PromptContext, Verbosity, WizardPresenter, parse_answer};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based Formline helper",
    long_about = "Builds, previews, validates, and fills Formline templates from a text shell"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive template generator that creates a bundle of derived artifacts.
    New {
        /// Root directory where the generated bundle will be emitted.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Overwrite an existing bundle.
        #[arg(long)]
        force: bool,
        /// Show the generated template document for debugging.
        #[arg(long)]
        verbose: bool,
    },
    /// Non-interactive generator that consumes a JSON description.
    Generate {
        /// JSON file describing the template metadata + pages.
        #[arg(long, value_name = "INPUT")]
        input: PathBuf,
        /// Root directory where the generated bundle will be emitted.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Overwrite an existing bundle.
        #[arg(long)]
        force: bool,
        /// Show the generated template document for debugging.
        #[arg(long)]
        verbose: bool,
    },
    /// Validate an answer map against a template, page by page.
    Validate {
        /// Path to the template JSON.
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        /// Path to the answers JSON file (field id to value).
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Fill a template interactively and emit the submission document.
    Fill {
        /// Path to the template JSON.
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        /// Where to write the submission document (stdout when omitted).
        #[arg(long, value_name = "OUT")]
        out: Option<PathBuf>,
        /// Show progress and parse expectations.
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
    /// Print a text preview of every page.
    Preview {
        /// Path to the template JSON.
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::New {
            out,
            force,
            verbose,
        } => run_new(out, force, verbose),
        Command::Generate {
            input,
            out,
            force,
            verbose,
        } => run_generate(input, out, force, verbose),
        Command::Validate { template, answers } => run_validate(template, answers),
        Command::Fill {
            template,
            out,
            verbose,
        } => run_fill(template, out, verbose),
        Command::Preview { template } => run_preview(template),
    }
}

fn load_template(path: &PathBuf) -> CliResult<FormTemplate> {
    let contents = fs::read_to_string(path)?;
    let template: FormTemplate = serde_json::from_str(&contents)?;
    Ok(template)
}

fn run_generate(input: PathBuf, out: Option<PathBuf>, force: bool, verbose: bool) -> CliResult<()> {
    let contents = fs::read_to_string(&input)?;
    let input: TemplateInput = serde_json::from_str(&contents)?;
    emit_bundle(input, out, force, verbose)
}

fn emit_bundle(
    input: TemplateInput,
    out: Option<PathBuf>,
    force: bool,
    verbose: bool,
) -> CliResult<()> {
    let out_root = out.unwrap_or_else(|| PathBuf::from("."));
    let target = builder::bundle_dir(&input, &out_root);
    if target.exists() && !force {
        return Err(format!(
            "bundle '{}' already exists; pass --force to overwrite",
            target.display()
        )
        .into());
    }

    let bundle = build_bundle(&input)?;
    let dir = write_bundle(&bundle, &input, &out_root)?;
    println!("Bundle written to {}", dir.display());
    if verbose {
        println!("{}", serde_json::to_string_pretty(&bundle.template)?);
    }
    Ok(())
}

fn run_validate(template: PathBuf, answers: PathBuf) -> CliResult<()> {
    let template = load_template(&template)?;
    template.check_integrity()?;
    let contents = fs::read_to_string(&answers)?;
    let answers: AnswerMap = serde_json::from_str(&contents)?;

    let mut all_valid = true;
    for page in &template.pages {
        let report = validate_page(&template, &page.id, &answers);
        if report.valid {
            println!("Page '{}': ok", page.name);
        } else {
            all_valid = false;
            println!("Page '{}': {} problem(s)", page.name, report.errors.len());
            for error in &report.errors {
                println!(" - {}: {}", error.field_id, error.message);
            }
        }
    }

    if all_valid {
        println!("Answers are valid");
        Ok(())
    } else {
        Err("answers failed validation".into())
    }
}

fn run_preview(template: PathBuf) -> CliResult<()> {
    let template = load_template(&template)?;
    template.check_integrity()?;
    let answers = AnswerMap::new();
    for index in 0..template.pages.len() {
        if let Some(view) = page_view(&template, index, &answers) {
            println!("{}", render_page_text(&view));
            println!();
        }
    }
    Ok(())
}

enum PageAction {
    Advance,
    Back,
}

fn run_fill(template: PathBuf, out: Option<PathBuf>, verbose: bool) -> CliResult<()> {
    let template = load_template(&template)?;
    let sink = InMemoryStore::new();
    let mut session = RespondentSession::new(template)?;
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    {
        let template = session.template();
        presenter.show_header(&template.name, template.description.as_deref());
    }

    let submission = loop {
        if session.state() == SessionState::Cover {
            let cover = session.template().cover_page.clone();
            presenter.show_cover(cover.title.as_deref(), cover.description.as_deref());
            read_input("")?;
            session.start()?;
        }

        let view = session
            .current_view()
            .ok_or("session has no active page")?;
        presenter.show_page(&view);

        if let PageAction::Back = prompt_page(&mut session, &presenter, &view)? {
            session.previous()?;
            continue;
        }

        let page_count = session.template().pages.len();
        let on_last = matches!(session.state(), SessionState::Page(index) if index + 1 == page_count);
        let step = if on_last {
            session.submit(&sink).map(Some)
        } else {
            session.next().map(|_| None)
        };

        match step {
            Ok(Some(submission)) => break submission,
            Ok(None) => {}
            Err(EngineError::NavigationRejected { notice, errors }) => {
                presenter.show_rejection(notice, &errors);
            }
            Err(other) => return Err(other.into()),
        }
    };

    presenter.show_completion(&submission);
    let json = serde_json::to_string_pretty(&submission)?;
    match out {
        Some(path) => {
            fs::write(&path, json)?;
            println!("Submission written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn prompt_page(
    session: &mut RespondentSession,
    presenter: &WizardPresenter,
    view: &PageView,
) -> CliResult<PageAction> {
    let answerable: Vec<&FieldView> = view
        .fields
        .iter()
        .filter(|field| field.visible && field.contract != InputContract::Display)
        .collect();
    let total = answerable.len();

    for (position, field) in answerable.iter().enumerate() {
        loop {
            presenter.show_prompt(&PromptContext::new(field, position + 1, total));
            let line = read_input("> ")?;
            if line.trim() == ":back" {
                return Ok(PageAction::Back);
            }
            match parse_answer(field, &line) {
                // Blank keeps whatever was answered before.
                Ok(None) => break,
                Ok(Some(value)) => {
                    session.set_answer(&field.id, value)?;
                    break;
                }
                Err(error) => presenter.show_parse_error(&error),
            }
        }
    }

    Ok(PageAction::Advance)
}

fn run_new(out: Option<PathBuf>, force: bool, verbose: bool) -> CliResult<()> {
    println!("Interactive Formline template generator");
    let name = prompt_non_empty("Template name", None)?;
    let description = prompt_optional("Description (optional)")?;
    let slug = prompt_optional("Publish slug (blank to keep draft)")?;

    let mut pages = Vec::new();
    loop {
        let label = if pages.is_empty() {
            "Page name"
        } else {
            "Page name (blank to finish)"
        };
        let page_name = match prompt_optional(label)? {
            Some(name) => name,
            None if pages.is_empty() => {
                println!("A template needs at least one page.");
                continue;
            }
            None => break,
        };

        let mut fields = Vec::new();
        loop {
            let Some(field_label) = prompt_optional("  Field label (blank to finish page)")? else {
                break;
            };
            let field_type = loop {
                let raw = prompt_non_empty("  Field type", Some("short-text"))?;
                match parse_field_type(&raw) {
                    Ok(kind) => break kind,
                    Err(error) => println!("  {error}"),
                }
            };
            let required = prompt_yes_no("  Required?", false)?;
            let options = if field_type.is_choice() {
                prompt_non_empty("  Options (comma-separated)", None)?
                    .split(',')
                    .map(|label| OptionInput::Label(label.trim().to_string()))
                    .collect()
            } else {
                Vec::new()
            };

            fields.push(FieldInput {
                id: None,
                field_type,
                label: field_label,
                placeholder: None,
                description: None,
                required,
                min_length: None,
                max_length: None,
                pattern: None,
                min: None,
                max: None,
                options,
                conditions: Vec::new(),
            });
        }

        pages.push(PageInput {
            name: page_name,
            description: None,
            fields,
        });
    }

    let input = TemplateInput {
        name,
        project_id: "local".into(),
        description,
        slug,
        dir_name: None,
        cover: None,
        pages,
    };
    emit_bundle(input, out, force, verbose)
}

/// Maps user-typed kind names (with common aliases) onto the closed set.
fn parse_field_type(value: &str) -> Result<FieldType, String> {
    let kind = match value.trim().to_lowercase().as_str() {
        "short-text" | "short" | "text" => FieldType::ShortText,
        "long-text" | "textarea" | "long" => FieldType::LongText,
        "email" => FieldType::Email,
        "phone" => FieldType::Phone,
        "url" => FieldType::Url,
        "password" => FieldType::Password,
        "number" => FieldType::Number,
        "currency" => FieldType::Currency,
        "multiple-choice" | "radio" => FieldType::MultipleChoice,
        "checkboxes" | "checkbox" => FieldType::Checkboxes,
        "dropdown" | "select" => FieldType::Dropdown,
        "picture-choice" => FieldType::PictureChoice,
        "date" => FieldType::Date,
        "time" => FieldType::Time,
        "date-time" | "datetime" => FieldType::DateTime,
        "date-range" => FieldType::DateRange,
        "rating" => FieldType::Rating,
        "ranking" => FieldType::Ranking,
        "slider" => FieldType::Slider,
        "opinion-scale" | "scale" => FieldType::OpinionScale,
        "file-upload" | "file" => FieldType::FileUpload,
        "signature" => FieldType::Signature,
        "color-picker" | "color" => FieldType::ColorPicker,
        "location" => FieldType::Location,
        "address" => FieldType::Address,
        "heading" => FieldType::Heading,
        "paragraph" => FieldType::Paragraph,
        "banner" => FieldType::Banner,
        "divider" => FieldType::Divider,
        "image" => FieldType::Image,
        "video" => FieldType::Video,
        other => return Err(format!("unknown field type '{other}'")),
    };
    Ok(kind)
}

fn read_input(prompt: &str) -> io::Result<String> {
    if !prompt.is_empty() {
        print!("{prompt}");
        io::stdout().flush()?;
    }
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn prompt_non_empty(label: &str, default: Option<&str>) -> CliResult<String> {
    loop {
        let suffix = default.map(|d| format!(" [{d}]")).unwrap_or_default();
        let line = read_input(&format!("{label}{suffix}: "))?;
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
        if let Some(default) = default {
            return Ok(default.to_string());
        }
        println!("A value is required.");
    }
}

fn prompt_optional(label: &str) -> CliResult<Option<String>> {
    let line = read_input(&format!("{label}: "))?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

fn prompt_yes_no(label: &str, default: bool) -> CliResult<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let line = read_input(&format!("{label} [{hint}]: "))?;
        match line.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" | "true" => return Ok(true),
            "n" | "no" | "false" => return Ok(false),
            _ => println!("Please answer yes or no."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_type_accepts_aliases() {
        assert_eq!(parse_field_type("text").unwrap(), FieldType::ShortText);
        assert_eq!(parse_field_type("SELECT").unwrap(), FieldType::Dropdown);
        assert_eq!(parse_field_type("datetime").unwrap(), FieldType::DateTime);
        assert!(parse_field_type("hologram").is_err());
    }
}
