use serde_json::{Map, Number, Value};

use formline_spec::{FieldError, FieldView, FormSubmission, InputContract, PageView};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: prompts only.
    Clean,
    /// Verbose output: progress, hidden-field counts, parse expectations.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Presenter responsible for printing the respondent-facing shell.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, form_name: &str, description: Option<&str>) {
        if self.header_printed {
            return;
        }
        println!("Form: {form_name}");
        if let Some(description) = description {
            println!("{description}");
        }
        self.header_printed = true;
    }

    pub fn show_cover(&self, title: Option<&str>, description: Option<&str>) {
        if let Some(title) = title {
            println!("{title}");
        }
        if let Some(description) = description {
            println!("{description}");
        }
        println!("Press Enter to start.");
    }

    pub fn show_page(&self, view: &PageView) {
        println!();
        println!(
            "Page {}/{}: {}",
            view.page_index + 1,
            view.page_count,
            view.page_name
        );
        if let Some(description) = &view.page_description {
            println!("{description}");
        }
        if self.verbosity.is_verbose() {
            let hidden = view.fields.iter().filter(|field| !field.visible).count();
            println!("Progress: {:.0}% ({hidden} hidden)", view.progress_percent);
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}/{} {}", prompt.index, prompt.total, prompt.label);
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{line}");
        if let Some(description) = &prompt.description {
            println!("{description}");
        }
        if self.verbosity.is_verbose() && !prompt.choices.is_empty() {
            println!("Choices: {}", prompt.choices.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {debug}");
        }
    }

    pub fn show_rejection(&self, notice: &str, errors: &[FieldError]) {
        eprintln!("{notice}");
        for error in errors {
            eprintln!(" - {}: {}", error.field_id, error.message);
        }
    }

    pub fn show_completion(&self, submission: &FormSubmission) {
        println!("Done ✅");
        if let Some(email) = &submission.respondent_email {
            println!("Respondent: {email}");
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub hint: Option<String>,
    pub choices: Vec<String>,
}

impl PromptContext {
    pub fn new(field: &FieldView, index: usize, total: usize) -> Self {
        let choices: Vec<String> = field
            .options
            .iter()
            .map(|option| option.label.clone())
            .collect();
        Self {
            index,
            total,
            label: field.label.clone(),
            description: field.description.clone(),
            required: field.required,
            hint: contract_hint(field.contract, &choices),
            choices,
        }
    }
}

fn contract_hint(contract: InputContract, choices: &[String]) -> Option<String> {
    match contract {
        InputContract::NumericText => Some("(number)".into()),
        InputContract::Rating => Some("(1-5)".into()),
        InputContract::Scale => Some("(integer)".into()),
        InputContract::SingleChoice if !choices.is_empty() => Some(format!("({})", choices.join("/"))),
        InputContract::MultiChoice => Some("(comma-separated choices)".into()),
        InputContract::Ranking => Some("(comma-separated order)".into()),
        InputContract::DateInput => Some("(YYYY-MM-DD)".into()),
        InputContract::TimeInput => Some("(HH:MM)".into()),
        InputContract::DateTimeInput => Some("(YYYY-MM-DDTHH:MM)".into()),
        InputContract::DateRange => Some("(YYYY-MM-DD..YYYY-MM-DD)".into()),
        InputContract::ColorValue => Some("(#rrggbb)".into()),
        _ => None,
    }
}

/// Error produced when parsing an answer typed by the respondent.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Parses typed input into the answer value the field's contract expects.
/// Blank input means "skip" and parses to `None`; required-ness is the
/// validator's concern, not the parser's.
pub fn parse_answer(field: &FieldView, input: &str) -> Result<Option<Value>, AnswerParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let value = match field.contract {
        InputContract::NumericText => {
            if input.parse::<f64>().is_err() {
                return Err(AnswerParseError::new(
                    "expected a number",
                    Some("a decimal number such as 42 or 3.5".into()),
                ));
            }
            Value::String(input.to_string())
        }
        InputContract::Rating | InputContract::Scale => {
            let parsed: i64 = input.parse().map_err(|_| {
                AnswerParseError::new("expected an integer", Some("a whole number".into()))
            })?;
            Value::Number(Number::from(parsed))
        }
        InputContract::SingleChoice => Value::String(match_option(field, input)?),
        InputContract::MultiChoice => {
            let mut selection = Map::new();
            for part in input.split(',') {
                let value = match_option(field, part.trim())?;
                selection.insert(value, Value::Bool(true));
            }
            Value::Object(selection)
        }
        InputContract::Ranking => {
            let mut order = Vec::new();
            for part in input.split(',') {
                order.push(Value::String(match_option(field, part.trim())?));
            }
            Value::Array(order)
        }
        InputContract::DateRange => {
            let (start, end) = input.split_once("..").ok_or_else(|| {
                AnswerParseError::new(
                    "expected a date range",
                    Some("start..end, e.g. 2024-06-01..2024-06-07".into()),
                )
            })?;
            let mut range = Map::new();
            range.insert("start".into(), Value::String(start.trim().to_string()));
            range.insert("end".into(), Value::String(end.trim().to_string()));
            Value::Object(range)
        }
        _ => Value::String(input.to_string()),
    };

    Ok(Some(value))
}

/// Accepts either the option label or its stored value, case-insensitively.
fn match_option(field: &FieldView, input: &str) -> Result<String, AnswerParseError> {
    if field.options.is_empty() {
        return Ok(input.to_string());
    }
    field
        .options
        .iter()
        .find(|option| {
            option.value.eq_ignore_ascii_case(input) || option.label.eq_ignore_ascii_case(input)
        })
        .map(|option| option.value.clone())
        .ok_or_else(|| {
            let known: Vec<&str> = field
                .options
                .iter()
                .map(|option| option.label.as_str())
                .collect();
            AnswerParseError::new(
                format!("'{input}' is not one of the choices"),
                Some(known.join(", ")),
            )
        })
}
