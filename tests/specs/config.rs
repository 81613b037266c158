//! Behavioral specs for nbcheck.toml handling.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn discover_root_from_config() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[discover]\nroot = \"notebooks\"\n");
    temp.notebook("notebooks/a.ipynb", &["1"]);
    temp.notebook("docs/b.ipynb", &["1"]);

    list()
        .pwd(temp.path())
        .passes()
        .stdout_eq("notebooks/a.ipynb\n");
}

#[test]
fn discover_exclude_from_config() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[discover]\nexclude = [\"drafts\"]\n");
    temp.notebook("docs/a.ipynb", &["1"]);
    temp.notebook("docs/drafts/b.ipynb", &["1"]);

    list().pwd(temp.path()).passes().stdout_eq("docs/a.ipynb\n");
}

#[test]
fn config_is_found_from_subdirectory() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[discover]\nroot = \"notebooks\"\n");
    temp.notebook("notebooks/a.ipynb", &["1"]);
    temp.file("sub/.keep", "");

    list()
        .pwd(temp.path().join("sub"))
        .passes()
        .stdout_has("a.ipynb");
}

#[test]
fn short_config_flag_works() {
    let temp = Project::empty();
    temp.file(
        "custom.toml",
        "version = 1\n[discover]\nroot = \"notebooks\"\n",
    );
    temp.notebook("notebooks/a.ipynb", &["1"]);

    list()
        .pwd(temp.path())
        .args(&["-C", "custom.toml"])
        .passes()
        .stdout_eq("notebooks/a.ipynb\n");
}

/// NBCHECK_CONFIG sets config file location
#[test]
fn env_config_sets_path() {
    let temp = Project::empty();
    temp.file(
        "custom.toml",
        "version = 1\n[discover]\nroot = \"notebooks\"\n",
    );
    temp.notebook("notebooks/a.ipynb", &["1"]);

    let config = temp.path().join("custom.toml");
    list()
        .pwd(temp.path())
        .env("NBCHECK_CONFIG", config.to_str().unwrap())
        .passes()
        .stdout_has("notebooks/a.ipynb");
}

#[test]
fn unknown_config_key_warns() {
    let temp = Project::empty();
    temp.raw_config("version = 1\nunknown_key = true\n[execute]\nkernal = \"python3\"\n");

    list()
        .pwd(temp.path())
        .passes()
        .stderr_has("unrecognized field `unknown_key`")
        .stderr_has("unrecognized field `execute.kernal`");
}

#[test]
fn valid_config_no_warnings() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[execute]\nkernel = \"python3\"\ntimeout = \"10m\"\n");

    list().pwd(temp.path()).passes().stderr_lacks("warning");
}

/// Exit code 2 for configuration errors
#[test]
fn unsupported_version_is_config_error() {
    let temp = Project::empty();
    temp.raw_config("version = 2\n");

    list()
        .pwd(temp.path())
        .exits(2)
        .stderr_has("unsupported config version 2");
}

#[test]
fn missing_version_is_config_error() {
    let temp = Project::empty();
    temp.raw_config("[discover]\nroot = \"docs\"\n");

    list()
        .pwd(temp.path())
        .exits(2)
        .stderr_has("missing required field: version");
}

#[test]
fn empty_command_is_config_error() {
    let temp = Project::empty();
    temp.raw_config("version = 1\n[execute]\ncommand = []\n");

    run()
        .pwd(temp.path())
        .exits(2)
        .stderr_has("execute.command must not be empty");
}

#[test]
fn invalid_toml_is_config_error() {
    let temp = Project::empty();
    temp.raw_config("version = \n");

    list().pwd(temp.path()).exits(2).stderr_has("config error");
}
