use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn generate_emits_a_bundle() -> TestResult {
    let workspace = assert_fs::TempDir::new()?;

    let mut cmd = Command::cargo_bin("formline")?;
    cmd.arg("generate")
        .arg("--input")
        .arg(fixture("survey.input.json"))
        .arg("--out")
        .arg(workspace.path())
        .assert()
        .success();

    let bundle = workspace.path().join("customer-survey");
    assert!(bundle.join("forms/customer-survey.form.json").exists());
    assert!(bundle.join("schemas/customer-survey.answers.schema.json").exists());
    assert!(bundle.join("samples/customer-survey.answers.example.json").exists());
    assert!(bundle.join("README.md").exists());

    let template: Value =
        serde_json::from_str(&fs::read_to_string(bundle.join("forms/customer-survey.form.json"))?)?;
    assert_eq!(template["slug"], "customer-survey");
    assert_eq!(template["isPublished"], true);
    assert_eq!(template["pages"][0]["fields"][0]["id"], "email");

    Ok(())
}

#[test]
fn generate_refuses_to_overwrite_without_force() -> TestResult {
    let workspace = assert_fs::TempDir::new()?;

    Command::cargo_bin("formline")?
        .arg("generate")
        .arg("--input")
        .arg(fixture("survey.input.json"))
        .arg("--out")
        .arg(workspace.path())
        .assert()
        .success();

    Command::cargo_bin("formline")?
        .arg("generate")
        .arg("--input")
        .arg(fixture("survey.input.json"))
        .arg("--out")
        .arg(workspace.path())
        .assert()
        .failure();

    Command::cargo_bin("formline")?
        .arg("generate")
        .arg("--input")
        .arg(fixture("survey.input.json"))
        .arg("--out")
        .arg(workspace.path())
        .arg("--force")
        .assert()
        .success();

    Ok(())
}

#[test]
fn generate_rejects_broken_inputs() -> TestResult {
    let workspace = assert_fs::TempDir::new()?;

    let assert = Command::cargo_bin("formline")?
        .arg("generate")
        .arg("--input")
        .arg(fixture("duplicate_ids.input.json"))
        .arg("--out")
        .arg(workspace.path())
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("duplicate"));

    Ok(())
}

#[test]
fn validate_accepts_good_answers() -> TestResult {
    let assert = Command::cargo_bin("formline")?
        .arg("validate")
        .arg("--template")
        .arg(fixture("contact.form.json"))
        .arg("--answers")
        .arg(fixture("contact.answers.json"))
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(stdout.contains("Answers are valid"));

    Ok(())
}

#[test]
fn validate_rejects_bad_answers() -> TestResult {
    let assert = Command::cargo_bin("formline")?
        .arg("validate")
        .arg("--template")
        .arg(fixture("contact.form.json"))
        .arg("--answers")
        .arg(fixture("contact.answers.bad.json"))
        .assert()
        .failure();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(stdout.contains("Please enter a valid email address"));

    Ok(())
}

#[test]
fn preview_prints_every_page() -> TestResult {
    let assert = Command::cargo_bin("formline")?
        .arg("preview")
        .arg("--template")
        .arg(fixture("contact.form.json"))
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(stdout.contains("Page 1/2: Contact"));
    assert!(stdout.contains("Page 2/2: Details"));

    Ok(())
}

#[test]
fn fill_runs_a_respondent_session_end_to_end() -> TestResult {
    let workspace = assert_fs::TempDir::new()?;
    let out = workspace.path().join("submission.json");

    // Enter past the cover, answer the email, skip the optional name; the
    // vip-only company field stays hidden so page two needs no input.
    let stdin = "\nguest@example.com\n\n";

    Command::cargo_bin("formline")?
        .arg("fill")
        .arg("--template")
        .arg(fixture("contact.form.json"))
        .arg("--out")
        .arg(&out)
        .write_stdin(stdin)
        .assert()
        .success();

    let submission: Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(submission["respondentEmail"], "guest@example.com");
    assert_eq!(submission["data"]["pg_contact"]["fld_email"], "guest@example.com");
    assert!(submission["data"].get("pg_details").is_none());

    Ok(())
}

#[test]
fn new_builds_a_template_interactively() -> TestResult {
    let workspace = assert_fs::TempDir::new()?;
    let answers = [
        "Quick Poll", // template name
        "",           // description
        "",           // slug (keep draft)
        "Main",       // first page name
        "Email",      // field label
        "email",      // field type
        "y",          // required
        "",           // finish page
        "",           // finish pages
    ];
    let stdin = format!("{}\n", answers.join("\n"));

    Command::cargo_bin("formline")?
        .arg("new")
        .arg("--out")
        .arg(workspace.path())
        .write_stdin(stdin)
        .assert()
        .success();

    let spec_path = workspace.path().join("quick-poll/forms/quick-poll.form.json");
    let template: Value = serde_json::from_str(&fs::read_to_string(&spec_path)?)?;
    assert_eq!(template["name"], "Quick Poll");
    assert_eq!(template["pages"][0]["fields"][0]["type"], "email");
    assert_eq!(
        template["pages"][0]["fields"][0]["validation"]["required"],
        true
    );
    assert_eq!(template["isPublished"], false);

    Ok(())
}
