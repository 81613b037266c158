// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook document model.
//!
//! A notebook is a version-tagged JSON document holding an ordered list of
//! cells. Cells stay opaque: they are carried through to the execution
//! engine untouched and never interpreted here. Format 2 and 3 documents are
//! upgraded to format 4 when read.

mod upgrade;

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structural version every notebook is read as.
pub const NOTEBOOK_FORMAT: u32 = 4;

/// Errors raised while loading a notebook document.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// The file could not be opened or read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a well-formed notebook document.
    #[error("malformed notebook: {0}")]
    Json(#[from] serde_json::Error),

    /// The document declares a structural version that cannot be read as 4.
    #[error("unsupported notebook format {found} (expected {expected})", expected = NOTEBOOK_FORMAT)]
    UnsupportedVersion { found: u32 },
}

/// A parsed notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Major structural version.
    pub nbformat: u32,

    /// Minor structural version.
    pub nbformat_minor: u32,

    /// Notebook-level metadata (kernelspec, language info, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Ordered cells.
    pub cells: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Read and parse the notebook at `path`.
    pub fn read(path: &Path) -> Result<Self, NotebookError> {
        let file = std::fs::File::open(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Parse a notebook from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, NotebookError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Parse a notebook from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, NotebookError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    fn from_value(mut doc: Value) -> Result<Self, NotebookError> {
        if let Value::Object(map) = &mut doc
            && let Some(found) = map.get("nbformat").and_then(Value::as_u64)
            && found < u64::from(NOTEBOOK_FORMAT)
        {
            if found < upgrade::OLDEST_UPGRADABLE {
                return Err(NotebookError::UnsupportedVersion {
                    found: found as u32,
                });
            }
            tracing::debug!("upgrading format {} notebook to {}", found, NOTEBOOK_FORMAT);
            upgrade::to_v4(map, found);
        }

        let notebook: Notebook = serde_json::from_value(doc)?;
        notebook.check_version()
    }

    fn check_version(self) -> Result<Self, NotebookError> {
        if self.nbformat != NOTEBOOK_FORMAT {
            return Err(NotebookError::UnsupportedVersion {
                found: self.nbformat,
            });
        }
        Ok(self)
    }

    /// Serialize the document for the execution engine.
    pub fn to_vec(&self) -> Result<Vec<u8>, NotebookError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Number of cells in the document.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl std::str::FromStr for Notebook {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
