use serde::{Deserialize, Serialize};

use crate::EventSource;
use officetpl_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

// Declare all domain modules
pub mod author;
pub mod backup;
pub mod copy;
pub mod general;
pub mod install;
pub mod mru;
pub mod paths;
pub mod platform;
pub mod uninstall;

// Re-export all domain events
pub use author::*;
pub use backup::*;
pub use copy::*;
pub use general::*;
pub use install::*;
pub use mru::*;
pub use paths::*;
pub use platform::*;
pub use uninstall::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Directory resolution and folder listings
    Paths(PathsEvent),

    /// Author metadata checks
    Author(AuthorEvent),

    /// Base and custom template copies
    Copy(CopyEvent),

    /// Backups taken before overwrite or delete
    Backup(BackupEvent),

    /// Recent-templates registry lists
    Mru(MruEvent),

    /// Install run lifecycle
    Install(InstallEvent),

    /// Uninstall run lifecycle
    Uninstall(UninstallEvent),

    /// Office process and Explorer wrappers
    Platform(PlatformEvent),
}

impl AppEvent {
    /// Identify the log channel for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Paths(_) => EventSource::PATHS,
            Self::Author(_) => EventSource::AUTHOR,
            Self::Copy(event) => match event.stage() {
                CopyStage::Base => EventSource::COPY_BASE,
                CopyStage::Custom => EventSource::COPY_CUSTOM,
            },
            Self::Backup(_) => EventSource::BACKUP,
            Self::Mru(_) => EventSource::MRU,
            Self::Install(_) => EventSource::INSTALLER,
            Self::Uninstall(_) => EventSource::UNINSTALLER,
            Self::Platform(event) => match event.operation() {
                PlatformOperation::OpenFolders => EventSource::OPENING,
                PlatformOperation::LaunchApps => EventSource::APP_LAUNCH,
                PlatformOperation::CloseApps => EventSource::CLOSE_APPS,
            },
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            // Error-level events
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Copy(CopyEvent::Failed { .. }) => Level::ERROR,

            // Warning-level events
            Self::General(GeneralEvent::Warning { .. })
            | Self::Paths(PathsEvent::FolderUnreadable { .. })
            | Self::Author(AuthorEvent::Unreadable { .. } | AuthorEvent::Blocked { .. })
            | Self::Copy(CopyEvent::SourceMissing { .. } | CopyEvent::NoDestination { .. })
            | Self::Backup(BackupEvent::Failed { .. })
            | Self::Mru(MruEvent::KeyFailed { .. })
            | Self::Uninstall(
                UninstallEvent::Persisted { .. }
                | UninstallEvent::RemoveFailed { .. }
                | UninstallEvent::FailuresRemain { .. },
            )
            | Self::Platform(
                PlatformEvent::FolderOpenFallback { .. }
                | PlatformEvent::FolderOpenFailed { .. }
                | PlatformEvent::AppLaunchFailed { .. },
            ) => Level::WARN,

            // Debug-level events (per-entry detail)
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Mru(MruEvent::EntryWritten { .. })
            | Self::Uninstall(UninstallEvent::Checking { .. } | UninstallEvent::NotPresent { .. })
            | Self::Platform(PlatformEvent::ProcessCheckFailed { .. }) => Level::DEBUG,

            // Default to INFO for most events
            _ => Level::INFO,
        }
    }

    /// Whether this event is an end-of-run summary shown even outside design mode
    #[must_use]
    pub fn is_summary(&self) -> bool {
        matches!(
            self,
            Self::Install(InstallEvent::Completed { .. })
                | Self::Uninstall(
                    UninstallEvent::Completed { .. } | UninstallEvent::FailuresRemain { .. }
                )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn copy_stage_selects_channel() {
        let base = AppEvent::Copy(CopyEvent::Copied {
            stage: CopyStage::Base,
            file: "Normal.dotx".into(),
            destination: PathBuf::from("/t/Normal.dotx"),
        });
        let custom = AppEvent::Copy(CopyEvent::NoDestination {
            stage: CopyStage::Custom,
            file: "Letter.dotx".into(),
        });
        assert_eq!(base.event_source(), EventSource::COPY_BASE);
        assert_eq!(custom.event_source(), EventSource::COPY_CUSTOM);
        assert_eq!(custom.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn events_serialize_with_domain_tag() {
        let event = AppEvent::Uninstall(UninstallEvent::Removed {
            path: PathBuf::from("/t/Blank.potx"),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "uninstall");
        assert_eq!(json["event"]["type"], "Removed");
        assert_eq!(event.event_source(), EventSource::UNINSTALLER);
    }

    #[test]
    fn summaries_are_flagged() {
        let done = AppEvent::Install(InstallEvent::Completed {
            files: 1,
            errors: 0,
            blocked: 0,
        });
        assert!(done.is_summary());
        assert!(!AppEvent::General(GeneralEvent::warning("x")).is_summary());
    }
}
