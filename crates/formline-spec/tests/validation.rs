use formline_spec::{
    AnswerMap, ConditionOperator, ConditionRule, FieldOption, FieldType, FormField, FormTemplate,
    validate_field, validate_page,
};
use serde_json::{Value, json};

fn field(field_type: FieldType, required: bool) -> FormField {
    let mut field = FormField::new(field_type, "Field");
    field.validation.required = required;
    field
}

fn answers(pairs: &[(&str, Value)]) -> AnswerMap {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

#[test]
fn required_fields_fail_on_missing_or_blank_answers() {
    let f = field(FieldType::ShortText, true);
    let error = validate_field(&f, None).expect("error");
    assert_eq!(error.code, "required");
    assert_eq!(error.message, "This field is required");

    assert!(validate_field(&f, Some(&json!("   "))).is_some());
    assert!(validate_field(&f, Some(&json!("hello"))).is_none());
}

#[test]
fn optional_fields_pass_when_unanswered() {
    let f = field(FieldType::Email, false);
    assert!(validate_field(&f, None).is_none());
    assert!(validate_field(&f, Some(&Value::Null)).is_none());
}

#[test]
fn email_format_is_checked_after_required() {
    let f = field(FieldType::Email, true);
    let error = validate_field(&f, Some(&json!("not-an-email"))).expect("error");
    assert_eq!(error.code, "format");
    assert_eq!(error.message, "Please enter a valid email address");
    assert!(validate_field(&f, Some(&json!("ada@example.com"))).is_none());
}

#[test]
fn url_phone_and_color_have_format_checks() {
    let url = field(FieldType::Url, false);
    assert!(validate_field(&url, Some(&json!("example.com"))).is_some());
    assert!(validate_field(&url, Some(&json!("https://example.com"))).is_none());

    let phone = field(FieldType::Phone, false);
    assert!(validate_field(&phone, Some(&json!("call me"))).is_some());
    assert!(validate_field(&phone, Some(&json!("+1 (555) 010-2030"))).is_none());

    let color = field(FieldType::ColorPicker, false);
    assert!(validate_field(&color, Some(&json!("blue"))).is_some());
    assert!(validate_field(&color, Some(&json!("#1a7f5a"))).is_none());
}

#[test]
fn numbers_are_numeric_strings_with_bounds() {
    let mut f = field(FieldType::Number, false);
    f.validation.min = Some(1.0);
    f.validation.max = Some(10.0);

    assert_eq!(
        validate_field(&f, Some(&json!("many"))).expect("error").code,
        "format"
    );
    assert_eq!(
        validate_field(&f, Some(&json!("0"))).expect("error").code,
        "min"
    );
    assert_eq!(
        validate_field(&f, Some(&json!("11"))).expect("error").code,
        "max"
    );
    assert!(validate_field(&f, Some(&json!("7.5"))).is_none());
}

#[test]
fn length_bounds_apply_to_text_answers() {
    let mut f = field(FieldType::ShortText, false);
    f.validation.min_length = Some(3);
    f.validation.max_length = Some(5);

    assert_eq!(
        validate_field(&f, Some(&json!("ab"))).expect("error").code,
        "min_length"
    );
    assert_eq!(
        validate_field(&f, Some(&json!("abcdef"))).expect("error").code,
        "max_length"
    );
    assert!(validate_field(&f, Some(&json!("abcd"))).is_none());
}

#[test]
fn author_patterns_apply_to_text_answers() {
    let mut f = field(FieldType::ShortText, false);
    f.validation.pattern = Some("^[A-Z]{2}-\\d+$".into());
    assert_eq!(
        validate_field(&f, Some(&json!("ticket-9"))).expect("error").code,
        "pattern"
    );
    assert!(validate_field(&f, Some(&json!("AB-9"))).is_none());

    // Unparseable author patterns are ignored rather than fatal.
    f.validation.pattern = Some("([".into());
    assert!(validate_field(&f, Some(&json!("anything"))).is_none());
}

#[test]
fn choice_answers_must_come_from_the_option_list() {
    let mut f = field(FieldType::Dropdown, false);
    f.options = vec![
        FieldOption::new("Search", "search"),
        FieldOption::new("Referral", "referral"),
    ];

    assert_eq!(
        validate_field(&f, Some(&json!("tv"))).expect("error").code,
        "choice"
    );
    assert!(validate_field(&f, Some(&json!("referral"))).is_none());

    let mut boxes = field(FieldType::Checkboxes, false);
    boxes.options = f.options.clone();
    assert!(validate_field(&boxes, Some(&json!({"tv": true}))).is_some());
    assert!(validate_field(&boxes, Some(&json!({"search": true, "referral": false}))).is_none());
}

#[test]
fn rating_must_be_one_through_five() {
    let f = field(FieldType::Rating, false);
    assert!(validate_field(&f, Some(&json!(0))).is_some());
    assert!(validate_field(&f, Some(&json!(6))).is_some());
    assert!(validate_field(&f, Some(&json!(3))).is_none());
}

#[test]
fn opinion_scale_defaults_to_zero_through_ten() {
    let f = field(FieldType::OpinionScale, false);
    assert_eq!(
        validate_field(&f, Some(&json!(11))).expect("error").code,
        "max"
    );
    assert!(validate_field(&f, Some(&json!(10))).is_none());
}

#[test]
fn dates_and_ranges_parse_strictly() {
    let date = field(FieldType::Date, false);
    assert!(validate_field(&date, Some(&json!("01/06/2024"))).is_some());
    assert!(validate_field(&date, Some(&json!("2024-06-01"))).is_none());

    let range = field(FieldType::DateRange, false);
    assert!(
        validate_field(&range, Some(&json!({"start": "2024-06-07", "end": "2024-06-01"}))).is_some()
    );
    assert!(
        validate_field(&range, Some(&json!({"start": "2024-06-01", "end": "2024-06-07"}))).is_none()
    );
}

#[test]
fn structural_fields_are_never_validated() {
    let mut f = field(FieldType::Heading, true);
    f.validation.required = true;
    assert!(validate_field(&f, None).is_none());
}

#[test]
fn wrong_shapes_fail_the_type_check() {
    let f = field(FieldType::ShortText, false);
    assert!(validate_field(&f, Some(&json!(42))).is_some());

    let boxes = field(FieldType::Checkboxes, false);
    assert!(validate_field(&boxes, Some(&json!("search"))).is_some());
}

#[test]
fn hidden_required_fields_do_not_block_the_page() {
    let mut template = FormTemplate::new("proj_1", "Branching");
    let page = template.pages[0].id.clone();
    let email = template
        .add_field(&page, FieldType::Email, "Work email")
        .expect("add field");
    let company = template
        .add_field(&page, FieldType::ShortText, "Company")
        .expect("add field");
    {
        let field = template.field_mut(&company).expect("field");
        field.validation.required = true;
        field.conditional_logic.push(ConditionRule::new(
            email.clone(),
            ConditionOperator::Equals,
            json!("vip@example.com"),
        ));
    }

    // Non-matching answer hides the required company field entirely.
    let report = validate_page(
        &template,
        &template.pages[0].id,
        &answers(&[(&email, json!("guest@example.com"))]),
    );
    assert!(report.valid);

    // Matching answer makes it visible, required, and blocking again.
    let report = validate_page(
        &template,
        &template.pages[0].id,
        &answers(&[(&email, json!("vip@example.com"))]),
    );
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field_id, company);
    assert_eq!(report.errors[0].message, "This field is required");
}

#[test]
fn validation_reports_every_failing_field_on_the_page() {
    let mut template = FormTemplate::new("proj_1", "Strict");
    let page = template.pages[0].id.clone();
    let email = template
        .add_field(&page, FieldType::Email, "Email")
        .expect("add field");
    let name = template
        .add_field(&page, FieldType::ShortText, "Name")
        .expect("add field");
    template.field_mut(&email).expect("field").validation.required = true;
    template.field_mut(&name).expect("field").validation.required = true;

    let report = validate_page(&template, &page, &AnswerMap::new());
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 2);
    assert!(report.error_for(&email).is_some());
    assert!(report.error_for(&name).is_some());
}
