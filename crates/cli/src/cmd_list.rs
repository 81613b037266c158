// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! List command implementation.

use termcolor::ColorChoice;

use nbcheck::cli::{Cli, ListArgs, OutputFormat};
use nbcheck::config;
use nbcheck::error::ExitCode;
use nbcheck::output::FormatOptions;
use nbcheck::output::json::JsonFormatter;
use nbcheck::output::text::TextFormatter;
use nbcheck::walker::NotebookWalker;

/// Run the list command.
pub fn run(cli: &Cli, args: &ListArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = config::load_for(cli.config.as_deref(), &cwd)?;

    let root = args
        .root
        .clone()
        .unwrap_or_else(|| config.discover.root.clone());

    let mut walker_config = config.discover.walker_config();
    walker_config.exclude_patterns.extend(args.exclude.iter().cloned());

    let (paths, stats) = NotebookWalker::new(walker_config).walk_collect(&root);
    tracing::debug!("{:?}", stats);

    match args.output {
        OutputFormat::Text => {
            TextFormatter::new(ColorChoice::Never, FormatOptions::default())
                .write_listing(&paths)?;
        }
        OutputFormat::Json => {
            JsonFormatter::new(std::io::stdout().lock()).write_listing(&root, &paths)?;
        }
    }

    Ok(ExitCode::Success)
}
