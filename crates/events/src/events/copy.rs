use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Which install pass produced a copy event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStage {
    Base,
    Custom,
}

/// Template copy events for both install passes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CopyEvent {
    /// Expected source file is absent from the payload
    SourceMissing { stage: CopyStage, source: PathBuf },

    /// No destination directory exists for the file
    NoDestination { stage: CopyStage, file: String },

    /// File copied
    Copied {
        stage: CopyStage,
        file: String,
        destination: PathBuf,
    },

    /// Copy failed with an I/O error
    Failed {
        stage: CopyStage,
        file: String,
        destination: PathBuf,
        failure: FailureContext,
    },
}

impl CopyEvent {
    #[must_use]
    pub fn stage(&self) -> CopyStage {
        match self {
            Self::SourceMissing { stage, .. }
            | Self::NoDestination { stage, .. }
            | Self::Copied { stage, .. }
            | Self::Failed { stage, .. } => *stage,
        }
    }
}
