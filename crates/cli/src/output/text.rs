// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! ```text
//! docs/b.ipynb: FAIL
//!   Failed executing docs/b.ipynb
//!     execution engine exited with exit status: 1
//!     RuntimeError: boom
//! 1 notebook passed, 1 failed
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::{ColorChoice, StandardStream, WriteColor};

use super::{FormatOptions, format_duration};
use crate::color::scheme;
use crate::suite::{CaseResult, SuiteResult};

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor = StandardStream> {
    out: W,
    options: FormatOptions,
}

impl TextFormatter<StandardStream> {
    /// Create a formatter writing to stdout.
    pub fn new(color_choice: ColorChoice, options: FormatOptions) -> Self {
        Self::with_writer(StandardStream::stdout(color_choice), options)
    }
}

impl<W: WriteColor> TextFormatter<W> {
    /// Create a formatter writing to `out`.
    pub fn with_writer(out: W, options: FormatOptions) -> Self {
        Self { out, options }
    }

    /// Consume the formatter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a single case result (streaming).
    pub fn write_case(&mut self, result: &CaseResult) -> std::io::Result<()> {
        match &result.outcome {
            Ok(_) if !self.options.verbose => Ok(()),
            Ok(_) => {
                self.write_path(&result.case.path)?;
                write!(self.out, ": ")?;
                self.out.set_color(&scheme::pass())?;
                write!(self.out, "PASS")?;
                self.out.reset()?;
                writeln!(self.out, " ({})", format_duration(result.duration))
            }
            Err(err) => {
                self.write_path(&result.case.path)?;
                write!(self.out, ": ")?;
                self.out.set_color(&scheme::fail())?;
                write!(self.out, "FAIL")?;
                self.out.reset()?;
                writeln!(self.out)?;

                writeln!(self.out, "  {}", err)?;

                // Cause messages already embed their own sources
                if let Some(detail) = err.detail() {
                    self.out.set_color(&scheme::detail())?;
                    for line in detail.lines() {
                        writeln!(self.out, "    {}", line)?;
                    }
                    self.out.reset()?;
                }
                Ok(())
            }
        }
    }

    fn write_path(&mut self, path: &Path) -> std::io::Result<()> {
        self.out.set_color(&scheme::path())?;
        write!(self.out, "{}", path.display())?;
        self.out.reset()
    }

    /// Write the summary line.
    pub fn write_summary(&mut self, result: &SuiteResult, root: &Path) -> std::io::Result<()> {
        if result.cases.is_empty() {
            return writeln!(self.out, "no notebooks found under {}", root.display());
        }

        let passed = result.passed_count();
        let failed = result.failed_count();
        let noun = if passed == 1 { "notebook" } else { "notebooks" };

        self.out.set_color(&scheme::summary())?;
        if failed == 0 {
            write!(self.out, "{} {} passed", passed, noun)?;
        } else {
            write!(self.out, "{} {} passed, {} failed", passed, noun, failed)?;
        }
        self.out.reset()?;

        if self.options.verbose {
            write!(self.out, " in {}", format_duration(result.total_time))?;
        }
        writeln!(self.out)
    }

    /// Write discovered notebook paths, one per line.
    pub fn write_listing(&mut self, paths: &[PathBuf]) -> std::io::Result<()> {
        for path in paths {
            writeln!(self.out, "{}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
