use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Backup-before-overwrite events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackupEvent {
    /// Existing file copied into the `Backups` folder
    Created { target: PathBuf, backup: PathBuf },

    /// A backup with the same timestamp already exists
    AlreadyExists { target: PathBuf, backup: PathBuf },

    /// Backup could not be written; the triggering step continues
    Failed {
        target: PathBuf,
        failure: FailureContext,
    },
}
