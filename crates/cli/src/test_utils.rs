// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
///
/// # Example
///
/// ```ignore
/// let tmp = TempDir::new().unwrap();
/// create_tree(tmp.path(), &[
///     ("docs/intro.ipynb", &notebook_json(&["print('hi')"])),
///     ("docs/readme.md", "# docs"),
/// ]);
/// ```
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Creates a temp directory populated with the given files.
pub fn temp_dir_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path(), files);
    dir
}

/// Creates a temp directory with a custom nbcheck.toml.
pub fn temp_project_with_config(config: &str) -> TempDir {
    temp_dir_with(&[("nbcheck.toml", config)])
}

/// Builds a format 4 notebook with one code cell per source string.
pub fn notebook_json(sources: &[&str]) -> String {
    let cells: Vec<serde_json::Value> = sources
        .iter()
        .map(|source| {
            serde_json::json!({
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": source,
            })
        })
        .collect();

    serde_json::json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            }
        },
        "cells": cells,
    })
    .to_string()
}
