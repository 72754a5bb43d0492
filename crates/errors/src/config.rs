//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("template folder could not be determined from {path}")]
    PayloadNotFound { path: String },

    #[error("no template folder was passed; refusing to run from {path}")]
    PayloadInAppData { path: String },
}

impl ConfigError {
    /// Payload resolution failures abort the run before anything is touched.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::PayloadNotFound { .. } | Self::PayloadInAppData { .. }
        )
    }
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Pass an existing file to --config or omit the flag."),
            Self::InvalidValue { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::PayloadNotFound { .. } | Self::PayloadInAppData { .. } => Some(
                "Launch the tool from the folder containing the templates or pass --payload.",
            ),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::PayloadNotFound { .. } => "config.payload_not_found",
            Self::PayloadInAppData { .. } => "config.payload_in_appdata",
        };
        Some(code)
    }
}
