//! Removal of installed templates and their recent-templates entries

use officetpl_errors::InstallError;
use officetpl_events::{AppEvent, EventEmitter, FailureContext, PathsEvent, UninstallEvent};
use officetpl_mru::MruStore;
use officetpl_platform::fs::{list_files, remove_file_checked, template_files, RemoveOutcome};
use officetpl_platform::RegistryStore;
use officetpl_types::{
    DestinationRole, DestinationSet, InstallFlags, OfficeApp, ResolvedPaths, TemplateFile,
    UninstallReport, BASE_TEMPLATES, NORMAL_TEMPLATE_NAMES,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::backup::backup_existing;

/// Reverses an install for one payload.
///
/// Every step checks for presence first, so running it again after a clean
/// removal changes nothing and reports no failures.
pub struct UninstallEngine<'a, E: EventEmitter + ?Sized> {
    destinations: &'a DestinationSet,
    mru: MruStore<'a>,
    emitter: &'a E,
    removed: Vec<PathBuf>,
    failures: Vec<PathBuf>,
    mru_cleared: usize,
}

impl<'a, E: EventEmitter + ?Sized> UninstallEngine<'a, E> {
    #[must_use]
    pub fn new(
        destinations: &'a DestinationSet,
        registry: &'a dyn RegistryStore,
        emitter: &'a E,
    ) -> Self {
        Self {
            destinations,
            mru: MruStore::new(registry),
            emitter,
            removed: Vec::new(),
            failures: Vec::new(),
            mru_cleared: 0,
        }
    }

    #[must_use]
    pub fn removed(&self) -> &[PathBuf] {
        &self.removed
    }

    #[must_use]
    pub fn failures(&self) -> &[PathBuf] {
        &self.failures
    }

    /// Folders worth opening after the run, judged from what is present now
    #[must_use]
    pub fn determine_open_flags(&self, base_dir: &Path) -> InstallFlags {
        let mut flags = InstallFlags::default();

        for base in &BASE_TEMPLATES {
            if let Some(dir) = self.destinations.get(base.destination) {
                if dir.join(base.file_name).exists() {
                    flags.mark_folder(base.destination);
                }
            }
        }

        if self
            .destinations
            .get(DestinationRole::Themes)
            .is_some_and(Path::exists)
        {
            flags.open_theme_folder = true;
            flags.open_document_theme = true;
        }

        for template in payload_templates(base_dir) {
            if template.is_base() {
                continue;
            }
            for (role, dir) in self.destinations.iter() {
                if role != DestinationRole::Themes && dir.join(&template.file_name).exists() {
                    flags.mark_folder(role);
                }
            }
            if template.is_theme() {
                flags.open_theme_folder = true;
                flags.open_document_theme = true;
            }
        }
        flags
    }

    /// Report the files currently present in every template folder
    pub fn log_folder_contents(&self, paths: &ResolvedPaths) {
        for (label, folder) in paths.template_folders() {
            let event = match list_files(folder) {
                Ok(files) => PathsEvent::FolderContents {
                    label: label.to_string(),
                    path: folder.to_path_buf(),
                    files,
                },
                Err(err) => PathsEvent::FolderUnreadable {
                    label: label.to_string(),
                    path: folder.to_path_buf(),
                    error: err.to_string(),
                },
            };
            self.emitter.emit(AppEvent::Paths(event));
        }
    }

    /// Delete the Word `Normal*` templates from the roaming folder, without backup.
    ///
    /// Office may write `Normal.dotm` back when it closes, so runs call this
    /// both first and last.
    pub fn remove_normal_templates(&mut self) {
        let Some(roaming) = self.destinations.get(DestinationRole::Roaming) else {
            return;
        };
        if !roaming.is_dir() {
            self.emitter
                .emit(AppEvent::Uninstall(UninstallEvent::FolderMissing {
                    path: roaming.to_path_buf(),
                }));
            return;
        }
        for name in NORMAL_TEMPLATE_NAMES {
            let path = roaming.join(name);
            self.remove(&path, false);
        }
    }

    /// Back up and delete the ten base templates at their install locations.
    ///
    /// Files that could not be removed are named in one closing warning,
    /// as they are usually held open by Office or Outlook.
    pub fn remove_installed_templates(&mut self) {
        let mut failed = Vec::new();
        for base in &BASE_TEMPLATES {
            let Some(dir) = self.destinations.get(base.destination) else {
                continue;
            };
            let path = dir.join(base.file_name);
            if !self.remove(&path, true) {
                failed.push(path);
            }
        }
        if !failed.is_empty() {
            self.emitter
                .emit(AppEvent::Uninstall(UninstallEvent::FailuresRemain { paths: failed }));
        }
    }

    /// Delete every copy of each custom payload template, looking in all
    /// destination folders rather than only the one the file routes to
    pub fn delete_custom_copies(&mut self, base_dir: &Path) {
        let mut folders: Vec<&Path> = Vec::new();
        for dir in self.destinations.directories() {
            if !folders.contains(&dir) {
                folders.push(dir);
            }
        }

        for template in payload_templates(base_dir) {
            if template.is_base() {
                continue;
            }
            for folder in &folders {
                let candidate = folder.join(&template.file_name);
                if candidate.exists() {
                    self.remove(&candidate, false);
                }
            }
        }
    }

    /// Drop the payload's install locations from the recent-templates lists.
    ///
    /// Targets are the base template locations plus the routed location of
    /// every custom template except themes, grouped by application.
    /// Returns the number of lists rewritten.
    pub fn clear_mru_entries_for_payload(&mut self, base_dir: &Path) -> usize {
        let mut targets: BTreeMap<OfficeApp, Vec<String>> = BTreeMap::new();

        for base in &BASE_TEMPLATES {
            if let Some(dir) = self.destinations.get(base.destination) {
                targets
                    .entry(base.app)
                    .or_default()
                    .push(dir.join(base.file_name).to_string_lossy().into_owned());
            }
        }
        for template in payload_templates(base_dir) {
            if template.is_base() {
                continue;
            }
            let Some(app) = template.extension.app() else {
                continue;
            };
            if let Some((_, dir)) = self.destinations.resolve_destination(&template.file_name) {
                targets
                    .entry(app)
                    .or_default()
                    .push(dir.join(&template.file_name).to_string_lossy().into_owned());
            }
        }

        let mut cleared = 0;
        for app in OfficeApp::ALL {
            if let Some(paths) = targets.get(&app).filter(|paths| !paths.is_empty()) {
                cleared += self.mru.rewrite_excluding(app, paths, self.emitter);
            }
        }
        self.mru_cleared += cleared;
        cleared
    }

    /// Close the run and build its report
    #[must_use]
    pub fn into_report(self, payload_dir: PathBuf, flags: InstallFlags) -> UninstallReport {
        self.emitter
            .emit(AppEvent::Uninstall(UninstallEvent::Completed {
                removed: self.removed.len(),
                failures: self.failures.len(),
                mru_cleared: self.mru_cleared,
            }));
        UninstallReport {
            payload_dir,
            removed: self.removed,
            failures: self.failures,
            mru_cleared: self.mru_cleared,
            flags,
            duration_ms: 0,
        }
    }

    /// Delete `path` if present. Returns false when the file is still there.
    fn remove(&mut self, path: &Path, backup: bool) -> bool {
        self.emitter.emit(AppEvent::Uninstall(UninstallEvent::Checking {
            path: path.to_path_buf(),
        }));
        if !path.exists() {
            self.emitter
                .emit(AppEvent::Uninstall(UninstallEvent::NotPresent {
                    path: path.to_path_buf(),
                }));
            return true;
        }
        if backup {
            backup_existing(path, self.emitter);
        }

        let event = match remove_file_checked(path) {
            Ok(RemoveOutcome::NotPresent) => UninstallEvent::NotPresent {
                path: path.to_path_buf(),
            },
            Ok(RemoveOutcome::Removed) => {
                self.removed.push(path.to_path_buf());
                UninstallEvent::Removed {
                    path: path.to_path_buf(),
                }
            }
            Ok(RemoveOutcome::Persisted) => {
                self.record_failure(path);
                UninstallEvent::Persisted {
                    path: path.to_path_buf(),
                }
            }
            Err(err) => {
                self.record_failure(path);
                UninstallEvent::RemoveFailed {
                    path: path.to_path_buf(),
                    failure: FailureContext::from_error(&InstallError::delete_failed(path, &err)),
                }
            }
        };
        let still_there = matches!(
            event,
            UninstallEvent::Persisted { .. } | UninstallEvent::RemoveFailed { .. }
        );
        self.emitter.emit(AppEvent::Uninstall(event));
        !still_there
    }

    fn record_failure(&mut self, path: &Path) {
        if !self.failures.iter().any(|known| known == path) {
            self.failures.push(path.to_path_buf());
        }
    }
}

fn payload_templates(base_dir: &Path) -> Vec<TemplateFile> {
    template_files(base_dir)
        .unwrap_or_default()
        .into_iter()
        .filter_map(TemplateFile::from_path)
        .collect()
}
