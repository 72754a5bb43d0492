//! Registry and platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised by registry-backed stores
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RegistryError {
    #[error("registry not available on this platform")]
    Unavailable,

    #[error("could not open registry key {key}: {message}")]
    KeyOpenFailed { key: String, message: String },

    #[error("could not write {name} under {key}: {message}")]
    ValueWriteFailed {
        key: String,
        name: String,
        message: String,
    },

    #[error("could not delete {name} under {key}: {message}")]
    ValueDeleteFailed {
        key: String,
        name: String,
        message: String,
    },
}

impl UserFacingError for RegistryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable => Some("Recent-template lists are only maintained on Windows."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Unavailable => "registry.unavailable",
            Self::KeyOpenFailed { .. } => "registry.key_open_failed",
            Self::ValueWriteFailed { .. } => "registry.value_write_failed",
            Self::ValueDeleteFailed { .. } => "registry.value_delete_failed",
        };
        Some(code)
    }
}

/// Errors that can occur during platform-specific operations
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("could not open folder {path}: {message}")]
    OpenFolderFailed { path: String, message: String },

    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::OpenFolderFailed { .. } => "platform.open_folder_failed",
            Self::CapabilityUnavailable { .. } => "platform.capability_unavailable",
        };
        Some(code)
    }
}
