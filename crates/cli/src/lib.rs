// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Discover notebook documents under a directory tree and execute each one,
//! reporting one pass/fail test case per notebook.

pub mod cli;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod notebook;
pub mod output;
pub mod suite;
pub mod walker;

pub use cli::{Cli, Command, ListArgs, OutputFormat, RunArgs};
pub use config::Config;
pub use error::{Error, ExitCode, Result};
pub use executor::{ExecuteError, ExecuteOptions, Executor, NbconvertExecutor};
pub use notebook::{Notebook, NotebookError};
pub use suite::{CaseError, CaseResult, CaseState, SuiteResult, TestCase};
pub use walker::{NotebookWalker, Notebooks, WalkStats, WalkerConfig};

#[cfg(test)]
pub mod test_utils;
