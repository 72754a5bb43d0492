//! Structured logging integration for events
//!
//! Converts domain events into `tracing` records. The channel name, event id
//! and correlation id travel as structured fields; the message is the
//! human-readable line shown in design mode.

use officetpl_events::{
    AppEvent, AuthorEvent, BackupEvent, CopyEvent, CopyStage, EventMessage, FailureContext,
    GeneralEvent, InstallEvent, MruEvent, PathsEvent, PlatformEvent, PlatformOperation,
    UninstallEvent,
};
use std::fmt::Write as _;
use tracing::{debug, error, info, trace, warn};

/// Log an event at its own level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let text = describe(&message.event);
    match meta.tracing_level() {
        tracing::Level::ERROR => {
            error!(channel = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, "{text}");
        }
        tracing::Level::WARN => {
            warn!(channel = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, "{text}");
        }
        tracing::Level::INFO => {
            info!(channel = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, "{text}");
        }
        tracing::Level::DEBUG => {
            debug!(channel = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, "{text}");
        }
        tracing::Level::TRACE => {
            trace!(channel = meta.source.as_str(), event_id = %meta.event_id, correlation = ?meta.correlation_id, "{text}");
        }
    }
}

/// Render an event as a single log line
#[must_use]
pub fn describe(event: &AppEvent) -> String {
    match event {
        AppEvent::General(event) => describe_general(event),
        AppEvent::Paths(event) => describe_paths(event),
        AppEvent::Author(event) => describe_author(event),
        AppEvent::Copy(event) => describe_copy(event),
        AppEvent::Backup(event) => describe_backup(event),
        AppEvent::Mru(event) => describe_mru(event),
        AppEvent::Install(event) => describe_install(event),
        AppEvent::Uninstall(event) => describe_uninstall(event),
        AppEvent::Platform(event) => describe_platform(event),
    }
}

fn describe_general(event: &GeneralEvent) -> String {
    match event {
        GeneralEvent::Warning { message, context } => with_suffix(message, context.as_deref()),
        GeneralEvent::Error { message, details } => with_suffix(message, details.as_deref()),
        GeneralEvent::DebugLog { message, context } => {
            let mut line = message.clone();
            let mut keys: Vec<_> = context.iter().collect();
            keys.sort();
            for (key, value) in keys {
                let _ = write!(line, " {key}={value}");
            }
            line
        }
        GeneralEvent::OperationStarted { operation } => format!("{operation} started"),
        GeneralEvent::OperationCompleted { operation, success } => {
            if *success {
                format!("{operation} completed")
            } else {
                format!("{operation} completed with issues")
            }
        }
        GeneralEvent::OperationFailed { operation, failure } => {
            format!("{operation} failed: {}", failure_text(failure))
        }
    }
}

fn describe_paths(event: &PathsEvent) -> String {
    match event {
        PathsEvent::Resolved { entries } => {
            let mut line = String::from("Resolved template folders:");
            for (label, path) in entries {
                let _ = write!(line, "\n  {label} = {}", path.display());
            }
            line
        }
        PathsEvent::RegistrySources { entries } => {
            let mut line = String::from("Registry template locations:");
            for (label, value) in entries {
                let _ = write!(line, "\n  {label} = {}", value.as_deref().unwrap_or("<unset>"));
            }
            line
        }
        PathsEvent::PayloadResolved {
            working_dir,
            payload_dir,
        } => format!(
            "Payload folder {} (started from {})",
            payload_dir.display(),
            working_dir.display()
        ),
        PathsEvent::FolderContents { label, path, files } => match files {
            Some(files) if files.is_empty() => format!("{label} ({}) is empty", path.display()),
            Some(files) => format!("{label} ({}): {}", path.display(), files.join(", ")),
            None => format!("{label} ({}) does not exist", path.display()),
        },
        PathsEvent::FolderUnreadable { label, path, error } => {
            format!("Could not list {label} ({}): {error}", path.display())
        }
    }
}

fn describe_author(event: &AuthorEvent) -> String {
    match event {
        AuthorEvent::FileInspected { file, author } => match author {
            Some(author) => format!("{file}: author '{author}'"),
            None => format!("{file}: no author"),
        },
        AuthorEvent::ThemeSkipped { file } => format!("{file}: theme, not inspected"),
        AuthorEvent::Unreadable { file, failure } => {
            format!("{file}: {}", failure_text(failure))
        }
        AuthorEvent::Blocked { path, message } => {
            format!("Blocked {}: {message}", path.display())
        }
        AuthorEvent::Checked {
            target,
            allowed,
            error,
            message,
        } => {
            let verdict = if *error {
                "error"
            } else if *allowed {
                "allowed"
            } else {
                "denied"
            };
            format!("Author check {} {verdict}: {message}", target.display())
        }
    }
}

fn describe_copy(event: &CopyEvent) -> String {
    match event {
        CopyEvent::SourceMissing { stage, source } => {
            format!("{} source missing: {}", stage_label(*stage), source.display())
        }
        CopyEvent::NoDestination { stage, file } => {
            format!("{} has no destination: {file}", stage_label(*stage))
        }
        CopyEvent::Copied {
            stage,
            file,
            destination,
        } => format!(
            "{} copied {file} -> {}",
            stage_label(*stage),
            destination.display()
        ),
        CopyEvent::Failed {
            stage,
            file,
            destination,
            failure,
        } => format!(
            "{} failed to copy {file} -> {}: {}",
            stage_label(*stage),
            destination.display(),
            failure_text(failure)
        ),
    }
}

fn describe_backup(event: &BackupEvent) -> String {
    match event {
        BackupEvent::Created { target, backup } => {
            format!("Backed up {} to {}", target.display(), backup.display())
        }
        BackupEvent::AlreadyExists { target, backup } => format!(
            "Backup of {} already exists at {}",
            target.display(),
            backup.display()
        ),
        BackupEvent::Failed { target, failure } => {
            format!("Backup of {} failed: {}", target.display(), failure_text(failure))
        }
    }
}

fn describe_mru(event: &MruEvent) -> String {
    match event {
        MruEvent::Unavailable { app } => format!("{app}: recent-templates list unavailable"),
        MruEvent::UpdateStarted { app, path, keys } => {
            format!("{app}: adding {path} to {} list(s)", keys.len())
        }
        MruEvent::EntryWritten { key, index, path } => format!("{key} Item {index} = {path}"),
        MruEvent::KeyUpdated { key, path } => format!("{key} now starts with {path}"),
        MruEvent::ClearStarted { app, targets, keys } => format!(
            "{app}: removing {} template(s) from {} list(s)",
            targets.len(),
            keys.len()
        ),
        MruEvent::KeyCleared { key, removed, kept } => {
            format!("{key}: removed {removed}, kept {kept}")
        }
        MruEvent::KeyFailed { key, failure } => format!("{key}: {}", failure_text(failure)),
    }
}

fn describe_install(event: &InstallEvent) -> String {
    match event {
        InstallEvent::Started { payload_dir } => {
            format!("Installing templates from {}", payload_dir.display())
        }
        InstallEvent::BaseTemplatesProcessed {
            files,
            errors,
            blocked,
        } => format!("Base templates: files={files} errors={errors} blocked={blocked}"),
        InstallEvent::ThemeDelay { seconds } => {
            format!("Waiting {seconds}s before opening the document theme")
        }
        InstallEvent::Completed {
            files,
            errors,
            blocked,
        } => format!("Install finished: files={files} errors={errors} blocked={blocked}"),
    }
}

fn describe_uninstall(event: &UninstallEvent) -> String {
    match event {
        UninstallEvent::Started { payload_dir } => {
            format!("Removing templates of {}", payload_dir.display())
        }
        UninstallEvent::Checking { path } => format!("Checking {}", path.display()),
        UninstallEvent::NotPresent { path } => format!("Not present: {}", path.display()),
        UninstallEvent::Removed { path } => format!("Removed {}", path.display()),
        UninstallEvent::Persisted { path } => {
            format!("Still present after delete: {}", path.display())
        }
        UninstallEvent::RemoveFailed { path, failure } => {
            format!("Could not delete {}: {}", path.display(), failure_text(failure))
        }
        UninstallEvent::FolderMissing { path } => {
            format!("Folder does not exist: {}", path.display())
        }
        UninstallEvent::FailuresRemain { paths } => {
            let mut line = format!("{} file(s) could not be removed:", paths.len());
            for path in paths {
                let _ = write!(line, "\n  {}", path.display());
            }
            line.push_str("\nClose Office and run the uninstaller again.");
            line
        }
        UninstallEvent::Completed {
            removed,
            failures,
            mru_cleared,
        } => format!(
            "Uninstall finished: removed={removed} failures={failures} mru_cleared={mru_cleared}"
        ),
    }
}

fn describe_platform(event: &PlatformEvent) -> String {
    match event {
        PlatformEvent::Skipped { operation, reason } => {
            format!("{} skipped: {reason}", operation_label(*operation))
        }
        PlatformEvent::FolderOpening { label, path } => {
            format!("Opening {label}: {}", path.display())
        }
        PlatformEvent::FolderOpenFallback { label, error } => {
            format!("Opening {label} without selection: {error}")
        }
        PlatformEvent::FolderOpenFailed {
            label,
            path,
            failure,
        } => format!(
            "Could not open {label} ({}): {}",
            path.display(),
            failure_text(failure)
        ),
        PlatformEvent::AppLaunching { app } => format!("Launching {app}"),
        PlatformEvent::AppLaunchFailed { app, failure } => {
            format!("Could not launch {app}: {}", failure_text(failure))
        }
        PlatformEvent::ProcessTerminated { image } => format!("Closed {image}"),
        PlatformEvent::ProcessCheckFailed { image, error } => {
            format!("Could not check {image}: {error}")
        }
    }
}

fn stage_label(stage: CopyStage) -> &'static str {
    match stage {
        CopyStage::Base => "Base template",
        CopyStage::Custom => "Custom template",
    }
}

fn operation_label(operation: PlatformOperation) -> &'static str {
    match operation {
        PlatformOperation::OpenFolders => "Opening folders",
        PlatformOperation::LaunchApps => "Launching applications",
        PlatformOperation::CloseApps => "Closing applications",
    }
}

fn failure_text(failure: &FailureContext) -> String {
    let mut text = failure.message.clone();
    if let Some(code) = &failure.code {
        let _ = write!(text, " [{code}]");
    }
    if let Some(hint) = &failure.hint {
        let _ = write!(text, " ({hint})");
    }
    text
}

fn with_suffix(message: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(extra) => format!("{message}: {extra}"),
        None => message.to_string(),
    }
}
