// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use termcolor::ColorChoice;

use crate::config::duration::parse_duration;

/// Execute every notebook under a documentation tree and report failures
#[derive(Parser)]
#[command(name = "nbcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "NBCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute every discovered notebook
    Run(RunArgs),
    /// List the notebooks that would be executed
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Directory searched for notebooks (default: discover.root, then "docs")
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Kernel used to execute cells
    #[arg(long, value_name = "NAME")]
    pub kernel: Option<String>,

    /// Time limit per notebook (e.g. 600, 90s, 10m)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Exclude notebooks matching a glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Force color output
    #[arg(long)]
    pub color: bool,

    /// Disable color output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Also report passing notebooks
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RunArgs {
    /// Resolve color mode from flags, falling back to the environment.
    pub fn color_choice(&self) -> ColorChoice {
        if self.no_color {
            ColorChoice::Never
        } else if self.color {
            ColorChoice::Always
        } else {
            crate::color::resolve_color()
        }
    }
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Directory searched for notebooks (default: discover.root, then "docs")
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Exclude notebooks matching a glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
