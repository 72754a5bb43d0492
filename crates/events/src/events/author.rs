use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Author validation events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthorEvent {
    /// Author read from a file; `None` when the creator is empty
    FileInspected {
        file: String,
        author: Option<String>,
    },

    /// Theme skipped during a directory scan
    ThemeSkipped { file: String },

    /// Metadata could not be read
    Unreadable {
        file: String,
        failure: FailureContext,
    },

    /// File refused by the allowlist or for missing metadata
    Blocked { path: PathBuf, message: String },

    /// Summary of a single check
    Checked {
        target: PathBuf,
        allowed: bool,
        error: bool,
        message: String,
    },
}
