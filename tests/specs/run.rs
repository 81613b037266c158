//! Behavioral specs for `nbcheck run`.
//!
//! Each discovered notebook is one test case. A case passes when the
//! engine returns an executed document; the run exits 0 only if every
//! case passes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn empty_root_passes() {
    let temp = Project::with_engine();
    std::fs::create_dir_all(temp.path().join("docs")).unwrap();

    run()
        .pwd(temp.path())
        .passes()
        .stdout_eq("no notebooks found under docs\n");
}

#[test]
fn missing_root_passes() {
    let temp = Project::with_engine();

    run()
        .pwd(temp.path())
        .passes()
        .stdout_has("no notebooks found");
}

#[test]
fn all_notebooks_passing_exits_zero() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["x = 1", "print(x)"]);
    temp.notebook("docs/guide/b.ipynb", &["print(2)"]);

    run()
        .pwd(temp.path())
        .passes()
        .stdout_eq("2 notebooks passed\n");
}

#[test]
fn one_failure_among_passes_exits_one() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)"]);
    temp.notebook("docs/b.ipynb", &["raise ValueError('boom')"]);

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("docs/b.ipynb: FAIL")
        .stdout_has("  Failed executing docs/b.ipynb")
        .stdout_has("ValueError: boom")
        .stdout_has("1 notebook passed, 1 failed")
        .stdout_lacks("docs/a.ipynb: FAIL");
}

#[test]
fn every_notebook_runs_after_a_failure() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["raise RuntimeError()"]);
    temp.notebook("docs/b.ipynb", &["raise RuntimeError()"]);
    temp.notebook("docs/c.ipynb", &["print(3)"]);

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("docs/a.ipynb: FAIL")
        .stdout_has("docs/b.ipynb: FAIL")
        .stdout_has("1 notebook passed, 2 failed");
}

#[test]
fn malformed_notebook_fails_its_case() {
    let temp = Project::with_engine();
    temp.file("docs/broken.ipynb", "{ this is not json");
    temp.notebook("docs/ok.ipynb", &["print(1)"]);

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("Failed executing docs/broken.ipynb")
        .stdout_has("1 notebook passed, 1 failed");
}

#[test]
fn old_format_notebook_is_upgraded_and_passes() {
    let temp = Project::with_engine();
    temp.file(
        "docs/old.ipynb",
        r#"{"nbformat": 3, "nbformat_minor": 0, "metadata": {},
            "worksheets": [{"cells": [{"cell_type": "code", "input": "print(1)", "outputs": []}]}]}"#,
    );

    let json = run().pwd(temp.path()).json().passes().json();

    assert_eq!(json["cases"][0]["path"], "docs/old.ipynb");
    assert_eq!(json["cases"][0]["cells"], 1);
}

#[test]
fn unsupported_format_notebook_fails_its_case() {
    let temp = Project::with_engine();
    temp.file(
        "docs/new.ipynb",
        r#"{"nbformat": 5, "nbformat_minor": 0, "metadata": {}, "cells": []}"#,
    );

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("Failed executing docs/new.ipynb");
}

#[test]
fn empty_engine_output_fails_with_empty_notebook_message() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["vanish()"]);

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("Got empty notebook for docs/a.ipynb");
}

#[test]
fn timeout_fails_the_case() {
    let temp = Project::with_engine();
    temp.notebook("docs/slow.ipynb", &["import time; time.sleep(600)"]);

    run()
        .pwd(temp.path())
        .args(&["--timeout", "1s"])
        .exits(1)
        .stdout_has("Failed executing docs/slow.ipynb")
        .stdout_has("timed out after 1s");
}

#[test]
fn exclude_flag_skips_notebooks() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)"]);
    temp.notebook("docs/drafts/b.ipynb", &["raise ValueError()"]);

    run()
        .pwd(temp.path())
        .args(&["--exclude", "drafts"])
        .passes()
        .stdout_eq("1 notebook passed\n");
}

#[test]
fn verbose_reports_passing_notebooks() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)"]);

    run()
        .pwd(temp.path())
        .args(&["-v"])
        .passes()
        .stdout_has("docs/a.ipynb: PASS (")
        .stdout_has(predicates::str::is_match(r"1 notebook passed in \d+(ms|\.\ds)\n$").unwrap());
}

#[test]
fn kernel_flag_reaches_the_engine() {
    let temp = Project::empty();
    // Engine fails unless the requested kernel is passed through
    temp.raw_config(
        r#"version = 1
[execute]
command = ["sh", "-c", '''
input=$(cat)
for arg in "$0" "$@"; do
  case "$arg" in --ExecutePreprocessor.kernel_name=julia) printf '%s' "$input"; exit 0 ;; esac
done
if [ -z "$input" ]; then exit 0; fi
echo "wrong kernel" >&2
exit 1
''']
"#,
    );
    temp.notebook("docs/a.ipynb", &["1"]);

    run().pwd(temp.path()).exits(1).stdout_has("wrong kernel");
    run()
        .pwd(temp.path())
        .args(&["--kernel", "julia"])
        .passes();
}

#[test]
fn unavailable_engine_exits_three() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[execute]\ncommand = [\"nbcheck-no-such-engine\"]\n");
    temp.notebook("docs/a.ipynb", &["print(1)"]);

    run()
        .pwd(temp.path())
        .exits(3)
        .stderr_has("execution engine not available");
}

#[test]
fn unavailable_engine_is_fine_without_notebooks() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[execute]\ncommand = [\"nbcheck-no-such-engine\"]\n");

    run().pwd(temp.path()).passes();
}

#[test]
fn source_notebooks_are_left_untouched() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)"]);
    let before = std::fs::read_to_string(temp.path().join("docs/a.ipynb")).unwrap();

    run().pwd(temp.path()).passes();

    let after = std::fs::read_to_string(temp.path().join("docs/a.ipynb")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn dangling_notebook_link_fails_its_case() {
    let temp = Project::with_engine();
    temp.notebook("docs/a.ipynb", &["print(1)"]);
    std::os::unix::fs::symlink(
        temp.path().join("docs/gone.ipynb"),
        temp.path().join("docs/b.ipynb"),
    )
    .unwrap();

    run()
        .pwd(temp.path())
        .exits(1)
        .stdout_has("Failed executing docs/b.ipynb")
        .stdout_has("1 notebook passed, 1 failed");
}
