//! Persisted UI state blobs.
//!
//! These are the only pieces of widget state that survive across runs:
//! cursor position, sort/group indices, filter text, and the active source
//! slot/icon. The surrounding application decides where the blobs live; the
//! helpers here read and write them as JSON.
//!
//! Deserialization is forgiving by design: missing fields take their
//! defaults, and an unreadable file degrades to `Default::default()` with
//! `initialized` false, signaling the application to fall back to its
//! built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors surfaced by [`TransferSaveState::load`] and [`TransferSaveState::save`].
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read or write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse state file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Saved state of a single list pane.
///
/// `initialized` distinguishes "never saved" from "saved with defaults".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListSaveState {
    /// Active source slot (sourced lists only)
    pub slot: usize,
    /// Cursor position in the filtered list
    pub idx: usize,
    /// Active sorter index
    pub sort: usize,
    /// Active grouper index
    pub group: usize,
    /// Active source icon within the slot, if any
    pub icon: Option<char>,
    /// Filter text
    pub filter: String,
    pub initialized: bool,
}

/// Saved state of a dual-pane transfer UI: one blob per pane plus the focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransferSaveState {
    pub left: ListSaveState,
    pub right: ListSaveState,
    pub focus: usize,
    pub initialized: bool,
}

impl TransferSaveState {
    /// Load a state blob from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a state blob, degrading to defaults on any error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("ignoring unreadable state file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write the blob to a JSON file, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
