//! Behavioral specs for report formats and color handling.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn mixed_project() -> Project {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)", "print(2)"]);
    temp.notebook("docs/b.ipynb", &["raise ValueError('boom')"]);
    temp
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn json_output_reports_each_case() {
    let temp = mixed_project();

    let result = run().pwd(temp.path()).json().exits(1);
    let json = result.json();

    assert_eq!(json["passed"], false);
    assert_eq!(json["root"], "docs");
    assert_eq!(
        json["summary"],
        serde_json::json!({"total": 2, "passed": 1, "failed": 1})
    );

    let cases = json["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);

    assert_eq!(cases[0]["path"], "docs/a.ipynb");
    assert_eq!(cases[0]["passed"], true);
    assert_eq!(cases[0]["state"], "passed");
    assert_eq!(cases[0]["cells"], 2);
    assert!(cases[0].get("error").is_none());

    assert_eq!(cases[1]["path"], "docs/b.ipynb");
    assert_eq!(cases[1]["passed"], false);
    assert_eq!(cases[1]["state"], "failed");
    assert_eq!(cases[1]["kind"], "execution");
    assert_eq!(cases[1]["failed_from"], "executing");
    assert_eq!(cases[1]["error"], "Failed executing docs/b.ipynb");
    assert!(
        cases[1]["detail"].as_str().unwrap().contains("ValueError: boom"),
        "detail should carry the engine stderr: {}",
        cases[1]["detail"]
    );
}

#[test]
fn json_output_for_parse_failure() {
    let temp = Project::with_engine();
    temp.file("docs/broken.ipynb", "not json");

    let json = run().pwd(temp.path()).json().exits(1).json();
    let case = &json["cases"][0];

    assert_eq!(case["kind"], "parse");
    assert_eq!(case["failed_from"], "not_parsed");
}

#[test]
fn json_output_for_empty_root() {
    let temp = Project::with_engine();

    let json = run().pwd(temp.path()).json().passes().json();

    assert_eq!(json["passed"], true);
    assert_eq!(json["summary"]["total"], 0);
    assert_eq!(json["cases"], serde_json::json!([]));
    assert!(json["timestamp"].is_string());
}

#[test]
fn json_output_has_no_text_report() {
    let temp = mixed_project();

    run()
        .pwd(temp.path())
        .json()
        .exits(1)
        .stdout_lacks("FAIL")
        .stdout_has(predicates::str::starts_with("{"));
}

// =============================================================================
// COLOR
// =============================================================================

#[test]
fn no_color_env_disables_color() {
    let temp = mixed_project();

    run()
        .pwd(temp.path())
        .env("NO_COLOR", "1")
        .exits(1)
        .stdout_lacks("\x1b[");
}

#[test]
fn no_color_flag_disables_color() {
    let temp = mixed_project();

    run()
        .pwd(temp.path())
        .args(&["--no-color"])
        .env("COLOR", "1")
        .exits(1)
        .stdout_lacks("\x1b[");
}

#[test]
fn color_flag_forces_color() {
    let temp = mixed_project();

    run()
        .pwd(temp.path())
        .args(&["--color"])
        .exits(1)
        .stdout_has("\x1b[");
}

#[test]
fn piped_output_is_plain_by_default() {
    let temp = mixed_project();

    run().pwd(temp.path()).exits(1).stdout_lacks("\x1b[");
}
