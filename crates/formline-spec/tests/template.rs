use formline_spec::{
    ConditionOperator, ConditionRule, FieldType, FormTemplate, MutationError, SchemaIntegrityError,
};
use serde_json::{Value, json};

fn fixture() -> &'static str {
    include_str!("fixtures/contact_form.json")
}

fn sample_template() -> FormTemplate {
    let mut template = FormTemplate::new("proj_1", "Survey");
    let first_page = template.pages[0].id.clone();
    template
        .add_field(&first_page, FieldType::Email, "Work email")
        .expect("add field");
    template
}

#[test]
fn new_templates_start_with_one_page() {
    let template = FormTemplate::new("proj_1", "Survey");
    assert_eq!(template.pages.len(), 1);
    assert!(template.id.is_none());
    assert!(template.check_integrity().is_ok());
}

#[test]
fn removing_the_last_page_is_rejected() {
    let mut template = sample_template();
    let page_id = template.pages[0].id.clone();
    assert_eq!(template.remove_page(&page_id), Err(MutationError::LastPage));
    assert_eq!(template.pages.len(), 1);
}

#[test]
fn page_and_field_order_stays_dense_after_moves() {
    let mut template = sample_template();
    let second = template.add_page("Details");
    let third = template.add_page("Wrap up");
    template.move_page(&third, 0).expect("move page");

    let orders: Vec<usize> = template.pages.iter().map(|page| page.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(template.pages[0].id, third);

    let field_a = template
        .add_field(&second, FieldType::ShortText, "A")
        .expect("add field");
    template
        .add_field(&second, FieldType::ShortText, "B")
        .expect("add field");
    template.move_field(&field_a, 1).expect("move field");

    let page = template.page(&second).expect("page");
    let orders: Vec<usize> = page.fields.iter().map(|field| field.order).collect();
    assert_eq!(orders, vec![0, 1]);
    assert_eq!(page.fields[1].id, field_a);
}

#[test]
fn removing_a_field_cascades_rule_removal() {
    let mut template = sample_template();
    let source = template.fields().next().expect("field").1.id.clone();
    let page = template.pages[0].id.clone();
    let dependent = template
        .add_field(&page, FieldType::ShortText, "Company")
        .expect("add field");
    template
        .field_mut(&dependent)
        .expect("field")
        .conditional_logic
        .push(ConditionRule::new(
            source.clone(),
            ConditionOperator::Equals,
            json!("vip@example.com"),
        ));

    template.remove_field(&source).expect("remove field");

    let dependent = template.field(&dependent).expect("field");
    assert!(dependent.conditional_logic.is_empty());
    assert!(template.check_integrity().is_ok());
}

#[test]
fn removing_a_page_cascades_rule_removal_for_its_fields() {
    let mut template = sample_template();
    let source = template.fields().next().expect("field").1.id.clone();
    let details = template.add_page("Details");
    let dependent = template
        .add_field(&details, FieldType::ShortText, "Company")
        .expect("add field");
    template
        .field_mut(&dependent)
        .expect("field")
        .conditional_logic
        .push(ConditionRule::new(
            source,
            ConditionOperator::Equals,
            json!("x"),
        ));

    let first = template.pages[0].id.clone();
    template.remove_page(&first).expect("remove page");

    let dependent = template.field(&dependent).expect("field");
    assert!(dependent.conditional_logic.is_empty());
}

#[test]
fn duplicating_a_field_assigns_fresh_ids_and_copy_label() {
    let mut template = sample_template();
    let page = template.pages[0].id.clone();
    let original = template
        .add_field(&page, FieldType::Dropdown, "Channel")
        .expect("add field");
    template.field_mut(&original).expect("field").options =
        vec![formline_spec::FieldOption::new("Search", "search")];

    let copy = template.duplicate_field(&original).expect("duplicate");

    assert_ne!(copy, original);
    let original_field = template.field(&original).expect("original").clone();
    let copy_field = template.field(&copy).expect("copy");
    assert_eq!(copy_field.label, "Channel (Copy)");
    assert_ne!(copy_field.options[0].id, original_field.options[0].id);
    assert_eq!(copy_field.options[0].value, "search");
    // Copy sits directly after the original.
    let page = template.page(&page).expect("page");
    let position = page
        .fields
        .iter()
        .position(|field| field.id == copy)
        .expect("copy present");
    assert_eq!(page.fields[position - 1].id, original);
}

#[test]
fn integrity_rejects_dangling_and_self_references() {
    let mut template = sample_template();
    let field_id = template.fields().next().expect("field").1.id.clone();

    template
        .field_mut(&field_id)
        .expect("field")
        .conditional_logic
        .push(ConditionRule::new(
            "fld_missing",
            ConditionOperator::Equals,
            json!("x"),
        ));
    assert!(matches!(
        template.check_integrity(),
        Err(SchemaIntegrityError::DanglingRuleReference { .. })
    ));

    template.field_mut(&field_id).expect("field").conditional_logic = vec![ConditionRule::new(
        field_id.clone(),
        ConditionOperator::Equals,
        json!("x"),
    )];
    assert_eq!(
        template.check_integrity(),
        Err(SchemaIntegrityError::SelfReference(field_id))
    );
}

#[test]
fn integrity_rejects_rules_sourcing_structural_fields() {
    let mut template = sample_template();
    let page = template.pages[0].id.clone();
    let heading = template
        .add_field(&page, FieldType::Heading, "Intro")
        .expect("add field");
    let dependent = template
        .add_field(&page, FieldType::ShortText, "Company")
        .expect("add field");
    template
        .field_mut(&dependent)
        .expect("field")
        .conditional_logic
        .push(ConditionRule::new(
            heading,
            ConditionOperator::Equals,
            json!("x"),
        ));

    assert!(matches!(
        template.check_integrity(),
        Err(SchemaIntegrityError::StructuralRuleSource { .. })
    ));
}

#[test]
fn integrity_rejects_duplicate_field_ids() {
    let mut template = sample_template();
    let page = template.pages[0].id.clone();
    let first = template.fields().next().expect("field").1.id.clone();
    let second = template
        .add_field(&page, FieldType::ShortText, "Twin")
        .expect("add field");
    template.field_mut(&second).expect("field").id = first.clone();

    assert_eq!(
        template.check_integrity(),
        Err(SchemaIntegrityError::DuplicateFieldId(first))
    );
}

#[test]
fn publish_gates_on_integrity_and_assigns_slug() {
    let mut template = sample_template();
    template.publish("spring-survey").expect("publish");
    assert!(template.is_published);
    assert_eq!(template.slug.as_deref(), Some("spring-survey"));

    template.unpublish();
    assert!(!template.is_published);
    assert_eq!(template.slug.as_deref(), Some("spring-survey"));

    let field_id = template.fields().next().expect("field").1.id.clone();
    template
        .field_mut(&field_id)
        .expect("field")
        .conditional_logic
        .push(ConditionRule::new(
            "fld_missing",
            ConditionOperator::Equals,
            json!("x"),
        ));
    assert!(template.publish("spring-survey-2").is_err());
}

#[test]
fn fixture_round_trips_through_serde() {
    let template: FormTemplate = serde_json::from_str(fixture()).expect("deserialize");
    assert_eq!(template.pages.len(), 2);
    assert_eq!(template.pages[1].fields[1].conditional_logic.len(), 1);

    let original: Value = serde_json::from_str(fixture()).expect("raw value");
    let reserialized = serde_json::to_value(&template).expect("serialize");
    assert_eq!(reserialized, original);
}

#[test]
fn serialization_is_stable_across_cycles() {
    let template: FormTemplate = serde_json::from_str(fixture()).expect("deserialize");
    let first = serde_json::to_string(&template).expect("serialize");
    let again: FormTemplate = serde_json::from_str(&first).expect("reparse");
    let second = serde_json::to_string(&again).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn ensure_id_is_stable_once_assigned() {
    let mut template = sample_template();
    let assigned = template.ensure_id().to_string();
    assert!(assigned.starts_with("tpl_"));
    assert_eq!(template.ensure_id(), assigned);
}

#[test]
fn page_of_field_resolves_across_pages() {
    let mut template = sample_template();
    let details = template.add_page("Details");
    let field = template
        .add_field(&details, FieldType::ShortText, "Company")
        .expect("add field");

    let page = template.page_of_field(&field).expect("owning page");
    assert_eq!(page.id, details);
    assert!(template.page_of_field("fld_ghost").is_none());
}

#[test]
fn unknown_field_types_deserialize_to_the_fallback_kind() {
    let template: FormTemplate = serde_json::from_value(json!({
        "projectId": "proj_1",
        "name": "Future",
        "pages": [
            {
                "id": "pg_1",
                "name": "Page 1",
                "fields": [
                    { "id": "fld_new", "type": "hologram-scan", "label": "Scan" }
                ]
            }
        ]
    }))
    .expect("deserialize");

    assert_eq!(
        template.field("fld_new").expect("field").field_type,
        FieldType::Unknown
    );
}
