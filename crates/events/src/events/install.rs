use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Install run events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// Install run started for a payload directory
    Started { payload_dir: PathBuf },

    /// Base template pass finished
    BaseTemplatesProcessed {
        files: usize,
        errors: usize,
        blocked: usize,
    },

    /// Waiting before launching applications so a theme can settle
    ThemeDelay { seconds: u64 },

    /// Install run finished
    Completed {
        files: usize,
        errors: usize,
        blocked: usize,
    },
}
