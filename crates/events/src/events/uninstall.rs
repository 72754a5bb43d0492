use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Uninstall run events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UninstallEvent {
    /// Uninstall run started
    Started { payload_dir: PathBuf },

    /// Checking a candidate file
    Checking { path: PathBuf },

    /// Candidate not present; nothing to do
    NotPresent { path: PathBuf },

    /// File deleted
    Removed { path: PathBuf },

    /// File still exists after deletion
    Persisted { path: PathBuf },

    /// Deletion failed
    RemoveFailed {
        path: PathBuf,
        failure: FailureContext,
    },

    /// Roaming folder for Normal templates does not exist
    FolderMissing { path: PathBuf },

    /// Aggregate warning for files left behind
    FailuresRemain { paths: Vec<PathBuf> },

    /// Uninstall run finished
    Completed {
        removed: usize,
        failures: usize,
        mru_cleared: usize,
    },
}
