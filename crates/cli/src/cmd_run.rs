// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.

use nbcheck::cli::{Cli, OutputFormat, RunArgs};
use nbcheck::config;
use nbcheck::error::{Error, ExitCode};
use nbcheck::executor::Executor;
use nbcheck::output::FormatOptions;
use nbcheck::output::json::{self, JsonFormatter};
use nbcheck::output::text::TextFormatter;
use nbcheck::suite::{collect_cases, run_suite};
use nbcheck::walker::NotebookWalker;

/// Run the run command.
pub fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = config::load_for(cli.config.as_deref(), &cwd)?;

    let root = args
        .root
        .clone()
        .unwrap_or_else(|| config.discover.root.clone());

    let mut walker_config = config.discover.walker_config();
    walker_config.exclude_patterns.extend(args.exclude.iter().cloned());

    let mut opts = config.execute.options();
    if let Some(kernel) = &args.kernel {
        opts.kernel = kernel.clone();
    }
    if let Some(timeout) = args.timeout {
        opts.timeout = timeout;
    }

    let executor = config.execute.executor()?;

    let cases = collect_cases(&NotebookWalker::new(walker_config), &root);
    tracing::debug!(
        "running {} notebooks with kernel {} (timeout {:?})",
        cases.len(),
        opts.kernel,
        opts.timeout
    );

    if !cases.is_empty() && !executor.available() {
        return Err(Error::ExecutorUnavailable(format!(
            "`{}` could not be launched",
            executor.name()
        ))
        .into());
    }

    let result = match args.output {
        OutputFormat::Text => {
            let options = FormatOptions {
                verbose: args.verbose,
            };
            let mut formatter = TextFormatter::new(args.color_choice(), options);
            let mut write_error = None;

            let result = run_suite(cases, &executor, &opts, |case| {
                if let Err(e) = formatter.write_case(case) {
                    write_error.get_or_insert(e);
                }
            });

            if let Some(e) = write_error {
                return Err(e.into());
            }
            formatter.write_summary(&result, &root)?;
            result
        }
        OutputFormat::Json => {
            let result = run_suite(cases, &executor, &opts, |_| {});
            let output = json::create_output(&result, &root);
            JsonFormatter::new(std::io::stdout().lock()).write(&output)?;
            result
        }
    };

    Ok(if result.passed() {
        ExitCode::Success
    } else {
        ExitCode::NotebookFailed
    })
}
