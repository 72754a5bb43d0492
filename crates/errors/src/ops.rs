//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OpsError {
    #[error("missing component: {component}")]
    MissingComponent { component: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::SerializationError { .. } => "ops.serialization_error",
        };
        Some(code)
    }
}
