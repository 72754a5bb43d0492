//! Report type definitions for operations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::install::{InstallCounters, InstallFlags};

/// Install run report
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InstallReport {
    /// Payload directory templates were read from
    pub payload_dir: PathBuf,
    /// Files copied, errors and author-blocked templates
    #[serde(flatten)]
    pub counters: InstallCounters,
    /// Destination paths written, in processing order
    pub copied: Vec<PathBuf>,
    /// Source files refused by author validation
    pub blocked_files: Vec<PathBuf>,
    /// Folders and applications opened afterwards
    pub flags: InstallFlags,
    /// Total execution time
    pub duration_ms: u64,
}

impl InstallReport {
    #[must_use]
    pub fn files(&self) -> usize {
        self.counters.files
    }

    #[must_use]
    pub fn errors(&self) -> usize {
        self.counters.errors
    }

    #[must_use]
    pub fn blocked(&self) -> usize {
        self.counters.blocked
    }
}

/// Uninstall run report
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UninstallReport {
    /// Payload directory used to find custom copies
    pub payload_dir: PathBuf,
    /// Files deleted
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted or persisted after deletion
    pub failures: Vec<PathBuf>,
    /// MRU lists rewritten
    pub mru_cleared: usize,
    /// Folders opened afterwards
    pub flags: InstallFlags,
    /// Total execution time
    pub duration_ms: u64,
}

impl UninstallReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
