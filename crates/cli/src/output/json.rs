// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! JSON is buffered and written once the whole suite has run (not streamed).

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::suite::{CaseResult, CaseState, SuiteResult};

/// Complete report for one run.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub timestamp: String,
    pub root: String,
    pub passed: bool,
    pub total_ms: u64,
    pub summary: Summary,
    pub cases: Vec<CaseOutput>,
}

/// Pass/fail counts.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// One notebook in the report.
#[derive(Debug, Serialize)]
pub struct CaseOutput {
    pub path: String,
    pub passed: bool,
    pub state: CaseState,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_from: Option<CaseState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&CaseResult> for CaseOutput {
    fn from(result: &CaseResult) -> Self {
        let error = result.error();
        Self {
            path: result.case.id(),
            passed: result.passed(),
            state: result.state(),
            duration_ms: result.duration.as_millis() as u64,
            cells: result.outcome.as_ref().ok().copied(),
            kind: error.map(|e| e.kind()),
            failed_from: error.map(|e| e.failed_from()),
            error: error.map(|e| e.to_string()),
            detail: error.and_then(|e| e.detail()),
        }
    }
}

/// Listing produced by `nbcheck list -o json`.
#[derive(Debug, Serialize)]
struct ListOutput {
    root: String,
    notebooks: Vec<String>,
}

/// Build the report for a finished suite with the current timestamp.
pub fn create_output(result: &SuiteResult, root: &Path) -> RunOutput {
    RunOutput {
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        root: root.display().to_string(),
        passed: result.passed(),
        total_ms: result.total_time.as_millis() as u64,
        summary: Summary {
            total: result.cases.len(),
            passed: result.passed_count(),
            failed: result.failed_count(),
        },
        cases: result.cases.iter().map(Into::into).collect(),
    }
}

/// JSON output formatter.
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the complete JSON report.
    pub fn write(&mut self, output: &RunOutput) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(output).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }

    /// Write discovered notebook paths.
    pub fn write_listing(&mut self, root: &Path, paths: &[PathBuf]) -> std::io::Result<()> {
        let listing = ListOutput {
            root: root.display().to_string(),
            notebooks: paths.iter().map(|p| p.display().to_string()).collect(),
        };
        let json = serde_json::to_string_pretty(&listing).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
