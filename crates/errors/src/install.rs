//! Install and uninstall error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum InstallError {
    #[error("source template not found: {path}")]
    SourceMissing { path: String },

    #[error("no destination for {file}")]
    NoDestination { file: String },

    #[error("copy of {file} to {destination} failed: {message}")]
    CopyFailed {
        file: String,
        destination: String,
        message: String,
    },

    #[error("could not delete {path}: {message}")]
    DeleteFailed { path: String, message: String },

    #[error("file persisted after delete: {path}")]
    DeletePersisted { path: String },

    #[error("could not back up {path}: {message}")]
    BackupFailed { path: String, message: String },

    #[error("could not create directory {path}: {message}")]
    DirectoryFailed { path: String, message: String },
}

impl InstallError {
    /// Build a copy failure from an `io::Error`
    #[must_use]
    pub fn copy_failed(
        file: &str,
        destination: &std::path::Path,
        err: &std::io::Error,
    ) -> Self {
        Self::CopyFailed {
            file: file.to_string(),
            destination: destination.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Build a delete failure from an `io::Error`
    #[must_use]
    pub fn delete_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::DeleteFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl UserFacingError for InstallError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SourceMissing { .. } => {
                Some("Run the installer from the folder that contains the templates.")
            }
            Self::CopyFailed { .. }
            | Self::DeleteFailed { .. }
            | Self::DeletePersisted { .. } => {
                Some("Close Office and Outlook, then run the tool again.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CopyFailed { .. } | Self::DeleteFailed { .. } | Self::DeletePersisted { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SourceMissing { .. } => "install.source_missing",
            Self::NoDestination { .. } => "install.no_destination",
            Self::CopyFailed { .. } => "install.copy_failed",
            Self::DeleteFailed { .. } => "install.delete_failed",
            Self::DeletePersisted { .. } => "install.delete_persisted",
            Self::BackupFailed { .. } => "install.backup_failed",
            Self::DirectoryFailed { .. } => "install.directory_failed",
        };
        Some(code)
    }
}
