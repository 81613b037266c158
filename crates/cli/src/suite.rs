// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook test suite.
//!
//! One test case is generated per discovered notebook. Each case walks
//! `NotParsed -> Parsed -> Executing -> {Passed, Failed}` and every error is
//! caught at the case boundary, so a failing notebook never stops its
//! siblings from running.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::executor::{ExecuteError, ExecuteOptions, Executor};
use crate::notebook::{Notebook, NotebookError};
use crate::walker::NotebookWalker;

/// One notebook to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Notebook path; doubles as the case identifier.
    pub path: PathBuf,
}

impl TestCase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Identifier shown in reports.
    pub fn id(&self) -> String {
        self.path.display().to_string()
    }
}

/// Lifecycle of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    NotParsed,
    Parsed,
    Executing,
    Passed,
    Failed,
}

/// Why a test case failed.
///
/// The headline names only the notebook; the underlying error stays
/// reachable through `source()`.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// The file is not a readable notebook document.
    #[error("Failed executing {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: NotebookError,
    },

    /// A cell raised, the kernel failed, or the time limit was exceeded.
    #[error("Failed executing {}", .path.display())]
    Execute {
        path: PathBuf,
        #[source]
        source: ExecuteError,
    },

    /// Execution finished without producing a document.
    #[error("Got empty notebook for {}", .path.display())]
    EmptyResult { path: PathBuf },
}

impl CaseError {
    /// Notebook the error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            CaseError::Parse { path, .. }
            | CaseError::Execute { path, .. }
            | CaseError::EmptyResult { path } => path,
        }
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::Parse { .. } => "parse",
            CaseError::Execute {
                source: ExecuteError::TimedOut { .. },
                ..
            } => "timeout",
            CaseError::Execute { .. } => "execution",
            CaseError::EmptyResult { .. } => "empty_result",
        }
    }

    /// State the case was in when it failed.
    pub fn failed_from(&self) -> CaseState {
        match self {
            CaseError::Parse { .. } => CaseState::NotParsed,
            CaseError::Execute { .. } | CaseError::EmptyResult { .. } => CaseState::Executing,
        }
    }

    /// Underlying error message, if any.
    pub fn detail(&self) -> Option<String> {
        std::error::Error::source(self).map(|source| source.to_string())
    }
}

/// Outcome of a single test case.
#[derive(Debug)]
pub struct CaseResult {
    pub case: TestCase,
    /// Number of executed cells on success.
    pub outcome: Result<usize, CaseError>,
    pub duration: Duration,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Terminal state: `Passed` or `Failed`.
    pub fn state(&self) -> CaseState {
        if self.passed() {
            CaseState::Passed
        } else {
            CaseState::Failed
        }
    }

    pub fn error(&self) -> Option<&CaseError> {
        self.outcome.as_ref().err()
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct SuiteResult {
    pub cases: Vec<CaseResult>,
    pub total_time: Duration,
}

impl SuiteResult {
    /// True when every case passed (vacuously true for an empty suite).
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }
}

/// Generate one test case per notebook under `root`.
pub fn collect_cases(walker: &NotebookWalker, root: &Path) -> Vec<TestCase> {
    let (paths, stats) = walker.walk_collect(root);
    tracing::debug!(
        "discovered {} notebooks under {} ({} other files skipped)",
        stats.notebooks_found,
        root.display(),
        stats.files_skipped
    );
    paths.into_iter().map(TestCase::new).collect()
}

fn execute_case(
    path: &Path,
    executor: &dyn Executor,
    opts: &ExecuteOptions,
) -> Result<usize, CaseError> {
    let notebook = Notebook::read(path).map_err(|source| CaseError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::trace!("{}: {:?}", path.display(), CaseState::Parsed);

    tracing::trace!("{}: {:?} with {}", path.display(), CaseState::Executing, executor.name());
    let executed = executor
        .execute(notebook, opts)
        .map_err(|source| CaseError::Execute {
            path: path.to_path_buf(),
            source,
        })?;

    match executed {
        Some(notebook) => Ok(notebook.cell_count()),
        None => Err(CaseError::EmptyResult {
            path: path.to_path_buf(),
        }),
    }
}

/// Run one test case to completion.
pub fn run_case(case: TestCase, executor: &dyn Executor, opts: &ExecuteOptions) -> CaseResult {
    let start = Instant::now();
    let outcome = execute_case(&case.path, executor, opts);
    let duration = start.elapsed();

    match &outcome {
        Ok(cells) => tracing::debug!("{}: passed ({} cells, {:?})", case.id(), cells, duration),
        Err(err) => tracing::debug!(
            "{}: failed from {:?}: {}",
            case.id(),
            err.failed_from(),
            err.detail().unwrap_or_default()
        ),
    }

    CaseResult {
        case,
        outcome,
        duration,
    }
}

/// Run every case sequentially, reporting each result as it completes.
pub fn run_suite(
    cases: Vec<TestCase>,
    executor: &dyn Executor,
    opts: &ExecuteOptions,
    mut on_case: impl FnMut(&CaseResult),
) -> SuiteResult {
    let start = Instant::now();
    let mut results = Vec::with_capacity(cases.len());

    for case in cases {
        let result = run_case(case, executor, opts);
        on_case(&result);
        results.push(result);
    }

    SuiteResult {
        cases: results,
        total_time: start.elapsed(),
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
