//! Template author validation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AuthorError {
    #[error("path not found: \"{path}\"")]
    PathNotFound { path: String },

    #[error("cannot list \"{path}\": {message}")]
    DirectoryUnreadable { path: String, message: String },

    #[error("{file}: {message}")]
    ArchiveUnreadable { file: String, message: String },

    #[error("could not read the author of \"{file}\" (core.xml missing)")]
    MetadataMissing { file: String },

    #[error("\"{file}\" has no author assigned")]
    AuthorMissing { file: String },

    #[error("author \"{author}\" is not allowed for \"{file}\"")]
    Blocked { file: String, author: String },
}

impl AuthorError {
    /// Whether this failure comes from an unreadable or missing input rather
    /// than from a judgement on readable metadata.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. }
                | Self::DirectoryUnreadable { .. }
                | Self::ArchiveUnreadable { .. }
                | Self::MetadataMissing { .. }
        )
    }
}

impl UserFacingError for AuthorError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ArchiveUnreadable { .. } | Self::MetadataMissing { .. } => {
                Some("Re-save the template from Office so it carries document properties.")
            }
            Self::AuthorMissing { .. } => {
                Some("Set the Author property of the template before distributing it.")
            }
            Self::Blocked { .. } => Some(
                "Add the author to AllowedTemplateAuthors or pass --allowed-authors to permit it.",
            ),
            Self::PathNotFound { .. } | Self::DirectoryUnreadable { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::PathNotFound { .. } => "author.path_not_found",
            Self::DirectoryUnreadable { .. } => "author.directory_unreadable",
            Self::ArchiveUnreadable { .. } => "author.archive_unreadable",
            Self::MetadataMissing { .. } => "author.metadata_missing",
            Self::AuthorMissing { .. } => "author.author_missing",
            Self::Blocked { .. } => "author.blocked",
        };
        Some(code)
    }
}
