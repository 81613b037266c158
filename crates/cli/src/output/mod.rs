// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for suite results.

pub mod json;
pub mod text;

use std::time::Duration;

/// Output formatting options.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Report passing notebooks as well as failures.
    pub verbose: bool,
}

impl FormatOptions {
    /// Options that report every notebook.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// Format a duration as a human-friendly string.
///
/// Returns e.g. "450ms" for short runs, "3.2s" for anything over 3 seconds.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms > 3000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
