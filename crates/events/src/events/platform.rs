//! Office process and Explorer wrapper events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use officetpl_types::OfficeApp;

use super::FailureContext;

/// Platform operation events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlatformEvent {
    /// Operation skipped because the host is not Windows
    Skipped {
        operation: PlatformOperation,
        reason: String,
    },

    /// Folder being opened
    FolderOpening { label: String, path: PathBuf },

    /// Primary open failed and the Explorer fallback is used
    FolderOpenFallback { label: String, error: String },

    /// Folder could not be opened at all
    FolderOpenFailed {
        label: String,
        path: PathBuf,
        failure: FailureContext,
    },

    /// Application being launched
    AppLaunching { app: OfficeApp },

    /// Application launch failed
    AppLaunchFailed {
        app: OfficeApp,
        failure: FailureContext,
    },

    /// A running Office process was asked to terminate
    ProcessTerminated { image: String },

    /// Terminating or checking a process failed
    ProcessCheckFailed { image: String, error: String },
}

/// Wrapper family an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOperation {
    OpenFolders,
    LaunchApps,
    CloseApps,
}

impl PlatformEvent {
    #[must_use]
    pub fn operation(&self) -> PlatformOperation {
        match self {
            Self::Skipped { operation, .. } => *operation,
            Self::FolderOpening { .. }
            | Self::FolderOpenFallback { .. }
            | Self::FolderOpenFailed { .. } => PlatformOperation::OpenFolders,
            Self::AppLaunching { .. } | Self::AppLaunchFailed { .. } => {
                PlatformOperation::LaunchApps
            }
            Self::ProcessTerminated { .. } | Self::ProcessCheckFailed { .. } => {
                PlatformOperation::CloseApps
            }
        }
    }
}
