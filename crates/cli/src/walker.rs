// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook discovery.
//!
//! Uses the `ignore` crate to walk a directory tree lazily and yield every
//! regular file whose name ends with `.ipynb`. Missing or empty roots
//! produce an empty sequence rather than an error.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

/// File name suffix identifying notebook documents.
pub const NOTEBOOK_SUFFIX: &str = ".ipynb";

/// Helper to check if an ignore::Error is a symlink loop error.
fn is_loop_error(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. } => is_loop_error(err),
        ignore::Error::WithDepth { err, .. } => is_loop_error(err),
        ignore::Error::WithLineNumber { err, .. } => is_loop_error(err),
        _ => false,
    }
}

/// Path an ignore::Error is about, if it names one.
fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } => error_path(err),
        ignore::Error::WithLineNumber { err, .. } => error_path(err),
        _ => None,
    }
}

/// Check whether a path names a notebook document.
///
/// Matches on the file name only; the check is case-sensitive.
pub fn is_notebook(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(NOTEBOOK_SUFFIX))
}

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Maximum directory depth (default: unlimited).
    pub max_depth: Option<usize>,

    /// Gitignore-style globs excluded during traversal.
    pub exclude_patterns: Vec<String>,

    /// Whether to respect gitignore files.
    pub git_ignore: bool,

    /// Whether to skip hidden files and directories.
    pub hidden: bool,

    /// Whether to follow symbolic links (loops are detected and skipped).
    pub follow_links: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            exclude_patterns: Vec::new(),
            git_ignore: false,
            hidden: false,
            follow_links: true,
        }
    }
}

/// Statistics from a walk operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Notebooks yielded.
    pub notebooks_found: usize,

    /// Regular files skipped because they are not notebooks.
    pub files_skipped: usize,

    /// Symlink loops detected.
    pub symlink_loops: usize,

    /// Errors encountered.
    pub errors: usize,
}

/// Recursive notebook walker.
///
/// Each call to [`NotebookWalker::walk`] starts a fresh traversal, so the
/// same walker can enumerate a tree any number of times.
#[derive(Debug, Clone, Default)]
pub struct NotebookWalker {
    config: WalkerConfig,
}

impl NotebookWalker {
    /// Create a new walker with the given configuration.
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Lazily enumerate notebooks under `root`.
    pub fn walk(&self, root: &Path) -> Notebooks {
        if !root.is_dir() {
            tracing::debug!("notebook root {} is not a directory", root.display());
            return Notebooks {
                inner: None,
                stats: WalkStats::default(),
            };
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(self.config.hidden)
            .git_ignore(self.config.git_ignore)
            .git_exclude(self.config.git_ignore)
            .git_global(self.config.git_ignore)
            .ignore(false)
            .parents(false)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth);

        // Override globs without `!` whitelist, so every pattern is negated
        if !self.config.exclude_patterns.is_empty() {
            let mut overrides = OverrideBuilder::new(root);
            for pattern in &self.config.exclude_patterns {
                if let Err(err) = overrides.add(&format!("!{}", pattern)) {
                    tracing::warn!("invalid exclude pattern {:?}: {}", pattern, err);
                }
            }
            match overrides.build() {
                Ok(overrides) => {
                    builder.overrides(overrides);
                }
                Err(err) => tracing::warn!("ignoring exclude patterns: {}", err),
            }
        }

        Notebooks {
            inner: Some(builder.build()),
            stats: WalkStats::default(),
        }
    }

    /// Walk and collect all notebooks, sorted by path.
    pub fn walk_collect(&self, root: &Path) -> (Vec<PathBuf>, WalkStats) {
        let mut notebooks = self.walk(root);
        let mut paths: Vec<PathBuf> = notebooks.by_ref().collect();
        paths.sort();
        (paths, notebooks.stats)
    }
}

/// Lazy sequence of notebook paths produced by [`NotebookWalker::walk`].
pub struct Notebooks {
    inner: Option<ignore::Walk>,
    stats: WalkStats,
}

impl Notebooks {
    /// Statistics accumulated so far.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }
}

impl Iterator for Notebooks {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let walk = self.inner.as_mut()?;

        for entry in walk.by_ref() {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }
                    if !is_notebook(entry.path()) {
                        self.stats.files_skipped += 1;
                        continue;
                    }
                    self.stats.notebooks_found += 1;
                    return Some(entry.into_path());
                }
                Err(err) => {
                    if is_loop_error(&err) {
                        tracing::warn!("Symlink loop detected: {}", err);
                        self.stats.symlink_loops += 1;
                        continue;
                    }

                    tracing::warn!("Walk error: {}", err);
                    self.stats.errors += 1;

                    // Still a test case: opening it reports the failure
                    if let Some(path) = error_path(&err)
                        && is_notebook(path)
                    {
                        self.stats.notebooks_found += 1;
                        return Some(path.to_path_buf());
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
