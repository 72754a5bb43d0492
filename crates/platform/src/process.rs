//! Office process and Explorer wrappers
//!
//! All operations are Windows-only. Elsewhere they emit a `Skipped` event and
//! return without side effects. Failures are reported as events and never
//! abort the calling run.

use officetpl_errors::PlatformError;
use officetpl_events::{AppEvent, EventEmitter, FailureContext, PlatformEvent, PlatformOperation};
use officetpl_types::{InstallFlags, OfficeApp, ResolvedPaths};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Images terminated before templates are replaced
pub const OFFICE_PROCESSES: [&str; 4] = ["WINWORD.EXE", "POWERPNT.EXE", "EXCEL.EXE", "OUTLOOK.EXE"];

/// Command builder for the few external programs the tool runs
#[derive(Debug, Clone)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl PlatformCommand {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Program and arguments joined for messages
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Run to completion and capture stdout/stderr
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub fn output(&self) -> Result<Output, PlatformError> {
        self.command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.failed(&e))
    }

    /// Run to completion with output discarded; the exit status is ignored
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub fn run_quiet(&self) -> Result<(), PlatformError> {
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|e| self.failed(&e))
    }

    /// Start without waiting
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub fn spawn_detached(&self) -> Result<(), PlatformError> {
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| self.failed(&e))
    }

    fn failed(&self, err: &std::io::Error) -> PlatformError {
        PlatformError::ProcessExecutionFailed {
            command: self.display(),
            message: err.to_string(),
        }
    }
}

fn is_windows() -> bool {
    cfg!(windows)
}

fn skipped<E: EventEmitter + ?Sized>(emitter: &E, operation: PlatformOperation) {
    emitter.emit(AppEvent::Platform(PlatformEvent::Skipped {
        operation,
        reason: "not running on Windows".to_string(),
    }));
}

fn taskkill(image: &str) -> PlatformCommand {
    let mut cmd = PlatformCommand::new("taskkill");
    cmd.args(["/IM", image, "/F"]);
    cmd
}

fn tasklist(image: &str) -> PlatformCommand {
    let filter = format!("IMAGENAME eq {image}");
    let mut cmd = PlatformCommand::new("tasklist");
    cmd.args(["/FI", filter.as_str(), "/NH"]);
    cmd
}

/// Terminate running Word, PowerPoint, Excel and Outlook instances, then
/// re-check each image and kill it again if it is still listed
pub fn close_office_apps<E: EventEmitter + ?Sized>(emitter: &E) {
    if !is_windows() {
        skipped(emitter, PlatformOperation::CloseApps);
        return;
    }
    for image in OFFICE_PROCESSES {
        match taskkill(image).run_quiet() {
            Ok(()) => emitter.emit(AppEvent::Platform(PlatformEvent::ProcessTerminated {
                image: image.to_string(),
            })),
            Err(err) => emitter.emit(AppEvent::Platform(PlatformEvent::ProcessCheckFailed {
                image: image.to_string(),
                error: err.to_string(),
            })),
        }
    }
    for image in OFFICE_PROCESSES {
        let still_running = tasklist(image).output().map(|output| {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            text.to_lowercase().contains(&image.to_lowercase())
        });
        match still_running {
            Ok(true) => {
                if let Err(err) = taskkill(image).run_quiet() {
                    emitter.emit(AppEvent::Platform(PlatformEvent::ProcessCheckFailed {
                        image: image.to_string(),
                        error: err.to_string(),
                    }));
                }
            }
            Ok(false) => {}
            Err(err) => emitter.emit(AppEvent::Platform(PlatformEvent::ProcessCheckFailed {
                image: image.to_string(),
                error: err.to_string(),
            })),
        }
    }
}

fn shell_open(target: &str) -> PlatformCommand {
    let mut cmd = PlatformCommand::new("cmd");
    cmd.args(["/C", "start", "", target]);
    cmd
}

fn open_folder<E: EventEmitter + ?Sized>(label: &str, path: &Path, emitter: &E) {
    let shown = path.display().to_string();
    if let Err(err) = crate::fs::ensure_directory(path) {
        let err = PlatformError::OpenFolderFailed {
            path: shown,
            message: err.to_string(),
        };
        emitter.emit(AppEvent::Platform(PlatformEvent::FolderOpenFailed {
            label: label.to_string(),
            path: path.to_path_buf(),
            failure: FailureContext::from_error(&err),
        }));
        return;
    }
    emitter.emit(AppEvent::Platform(PlatformEvent::FolderOpening {
        label: label.to_string(),
        path: path.to_path_buf(),
    }));
    let Err(primary) = shell_open(&shown).run_quiet() else {
        return;
    };
    emitter.emit(AppEvent::Platform(PlatformEvent::FolderOpenFallback {
        label: label.to_string(),
        error: primary.to_string(),
    }));
    let mut explorer = PlatformCommand::new("explorer");
    explorer.arg(&shown);
    if let Err(err) = explorer.spawn_detached() {
        emitter.emit(AppEvent::Platform(PlatformEvent::FolderOpenFailed {
            label: label.to_string(),
            path: path.to_path_buf(),
            failure: FailureContext::from_error(&err),
        }));
    }
}

/// Open the template folders selected by `flags` in Explorer, in display order
pub fn open_template_folders<E: EventEmitter + ?Sized>(
    paths: &ResolvedPaths,
    flags: &InstallFlags,
    emitter: &E,
) {
    if !is_windows() {
        skipped(emitter, PlatformOperation::OpenFolders);
        return;
    }
    for (label, path) in paths.template_folders() {
        if flags.wants_folder(label) {
            open_folder(label, path, emitter);
        }
    }
}

/// Start the Office applications selected by `flags`
pub fn launch_office_apps<E: EventEmitter + ?Sized>(flags: &InstallFlags, emitter: &E) {
    if !is_windows() {
        skipped(emitter, PlatformOperation::LaunchApps);
        return;
    }
    for app in flags.apps_to_launch() {
        launch_app(app, emitter);
    }
}

fn launch_app<E: EventEmitter + ?Sized>(app: OfficeApp, emitter: &E) {
    emitter.emit(AppEvent::Platform(PlatformEvent::AppLaunching { app }));
    if let Err(err) = shell_open(app.executable()).spawn_detached() {
        emitter.emit(AppEvent::Platform(PlatformEvent::AppLaunchFailed {
            app,
            failure: FailureContext::from_error(&err),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_builder_collects_arguments() {
        let cmd = tasklist("EXCEL.EXE");
        assert_eq!(cmd.program(), "tasklist");
        assert_eq!(cmd.get_args(), ["/FI", "IMAGENAME eq EXCEL.EXE", "/NH"]);
        assert_eq!(taskkill("WINWORD.EXE").display(), "taskkill /IM WINWORD.EXE /F");
    }

    #[cfg(not(windows))]
    #[test]
    fn wrappers_are_skipped_off_windows() {
        let (tx, mut rx) = officetpl_events::channel();
        let flags = InstallFlags {
            open_word: true,
            open_theme_folder: true,
            ..InstallFlags::default()
        };
        close_office_apps(&tx);
        launch_office_apps(&flags, &tx);

        let mut operations = Vec::new();
        while let Ok(message) = rx.try_recv() {
            match message.event {
                AppEvent::Platform(PlatformEvent::Skipped { operation, .. }) => {
                    operations.push(operation);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(
            operations,
            vec![PlatformOperation::CloseApps, PlatformOperation::LaunchApps]
        );
    }
}
