// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles nbcheck.toml parsing with version validation and unknown key warnings.

pub mod duration;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::discovery;
use crate::error::{Error, Result};
use crate::executor::{
    DEFAULT_COMMAND, DEFAULT_KERNEL, DEFAULT_TIMEOUT, ExecuteOptions, NbconvertExecutor,
};
use crate::walker::WalkerConfig;

/// Config file name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "nbcheck.toml";

/// Currently supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Directory searched for notebooks when nothing else is configured.
pub const DEFAULT_ROOT: &str = "docs";

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &["version", "discover", "execute"];

/// Known `[discover]` keys.
const KNOWN_DISCOVER_KEYS: &[&str] = &["root", "exclude", "hidden", "git_ignore", "max_depth"];

/// Known `[execute]` keys.
const KNOWN_EXECUTE_KEYS: &[&str] = &["kernel", "timeout", "command"];

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Full configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Notebook discovery settings.
    #[serde(default)]
    pub discover: DiscoverConfig,

    /// Execution engine settings.
    #[serde(default)]
    pub execute: ExecuteConfig,
}

/// `[discover]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    /// Directory searched for notebooks (default: "docs").
    #[serde(default = "DiscoverConfig::default_root")]
    pub root: PathBuf,

    /// Gitignore-style globs excluded from discovery.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Skip hidden files and directories.
    #[serde(default)]
    pub hidden: bool,

    /// Honor .gitignore files.
    #[serde(default)]
    pub git_ignore: bool,

    /// Maximum directory depth (default: unlimited).
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            exclude: Vec::new(),
            hidden: false,
            git_ignore: false,
            max_depth: None,
        }
    }
}

impl DiscoverConfig {
    fn default_root() -> PathBuf {
        PathBuf::from(DEFAULT_ROOT)
    }

    /// Walker settings for this section.
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_depth: self.max_depth,
            exclude_patterns: self.exclude.clone(),
            git_ignore: self.git_ignore,
            hidden: self.hidden,
            ..Default::default()
        }
    }
}

/// `[execute]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteConfig {
    /// Kernel that runs the cells (default: "python3").
    #[serde(default = "ExecuteConfig::default_kernel")]
    pub kernel: String,

    /// Wall-clock limit per notebook (default: 600 seconds).
    #[serde(
        default = "ExecuteConfig::default_timeout",
        deserialize_with = "duration::deserialize"
    )]
    pub timeout: Duration,

    /// Engine command line (default: ["jupyter", "nbconvert"]).
    #[serde(default = "ExecuteConfig::default_command")]
    pub command: Vec<String>,
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self {
            kernel: Self::default_kernel(),
            timeout: Self::default_timeout(),
            command: Self::default_command(),
        }
    }
}

impl ExecuteConfig {
    fn default_kernel() -> String {
        DEFAULT_KERNEL.to_string()
    }

    fn default_timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    fn default_command() -> Vec<String> {
        DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
    }

    /// Options passed to the engine for every notebook.
    pub fn options(&self) -> ExecuteOptions {
        ExecuteOptions {
            kernel: self.kernel.clone(),
            timeout: self.timeout,
        }
    }

    /// Engine built from the configured command.
    pub fn executor(&self) -> Result<NbconvertExecutor> {
        NbconvertExecutor::from_command(&self.command).ok_or_else(|| Error::Config {
            message: "execute.command must not be empty".to_string(),
            path: None,
        })
    }
}

/// Resolve and load the configuration for a command.
///
/// Uses the explicit path if given, otherwise searches upward from `cwd`.
/// A relative `discover.root` is anchored at the directory holding the
/// config file. Without any config file the defaults apply.
pub fn load_for(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let Some(path) = discovery::resolve_config(explicit, cwd)? else {
        tracing::debug!("no config found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!("loading config from {}", path.display());
    let mut config = load(&path)?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && dir != cwd
        && config.discover.root.is_relative()
    {
        config.discover.root = dir.join(&config.discover.root);
    }

    Ok(config)
}

/// Load and validate config from a file path, warning on unknown keys.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_with_warnings(&content, path)
}

/// Parse config from string content (strict mode).
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    // First check version
    let version_check: VersionOnly = toml::from_str(content).map_err(|e| Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    let version = version_check.version.ok_or_else(|| Error::Config {
        message: "missing required field: version".to_string(),
        path: Some(path.to_path_buf()),
    })?;

    if version != SUPPORTED_VERSION {
        return Err(Error::Config {
            message: format!(
                "unsupported config version {} (supported: {})\n  Upgrade nbcheck to use this config.",
                version, SUPPORTED_VERSION
            ),
            path: Some(path.to_path_buf()),
        });
    }

    let config: Config = toml::from_str(content).map_err(|e| Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    if config.execute.command.is_empty() {
        return Err(Error::Config {
            message: "execute.command must not be empty".to_string(),
            path: Some(path.to_path_buf()),
        });
    }

    Ok(config)
}

/// Parse config, warning on unknown keys.
pub fn parse_with_warnings(content: &str, path: &Path) -> Result<Config> {
    let config = parse(content, path)?;

    // parse() already validated the document
    if let Ok(toml::Value::Table(table)) = content.parse::<toml::Value>() {
        for key in unknown_keys(&table) {
            warn_unknown_key(path, &key);
        }
    }

    Ok(config)
}

/// Collect dotted names of unrecognized keys.
fn unknown_keys(table: &toml::value::Table) -> Vec<String> {
    let mut unknown = Vec::new();

    for (key, value) in table {
        let known_children = match key.as_str() {
            "discover" => KNOWN_DISCOVER_KEYS,
            "execute" => KNOWN_EXECUTE_KEYS,
            _ => {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    unknown.push(key.clone());
                }
                continue;
            }
        };

        if let toml::Value::Table(section) = value {
            for child in section.keys() {
                if !known_children.contains(&child.as_str()) {
                    unknown.push(format!("{}.{}", key, child));
                }
            }
        }
    }

    unknown
}

fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "nbcheck: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
