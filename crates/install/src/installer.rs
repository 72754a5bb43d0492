//! Base and custom template installation

use officetpl_author::AuthorValidator;
use officetpl_errors::InstallError;
use officetpl_events::{AppEvent, CopyEvent, CopyStage, EventEmitter, FailureContext, InstallEvent};
use officetpl_mru::MruStore;
use officetpl_platform::fs::{copy_preserving, template_files};
use officetpl_platform::RegistryStore;
use officetpl_types::{
    base_template, BaseTemplate, DestinationSet, InstallCounters, InstallFlags, InstallReport,
    TemplateFile, BASE_TEMPLATES,
};
use std::path::{Path, PathBuf};

use crate::backup::backup_existing;

/// Copies one payload into the destination folders.
///
/// The engine owns the run's counters and follow-up flags. Base templates
/// must be installed before custom ones so the last file copied for an
/// application ends up first in its recent-templates list.
pub struct InstallEngine<'a, E: EventEmitter + ?Sized> {
    destinations: &'a DestinationSet,
    validator: &'a AuthorValidator,
    mru: MruStore<'a>,
    emitter: &'a E,
    counters: InstallCounters,
    flags: InstallFlags,
    copied: Vec<PathBuf>,
    blocked_files: Vec<PathBuf>,
}

impl<'a, E: EventEmitter + ?Sized> InstallEngine<'a, E> {
    #[must_use]
    pub fn new(
        destinations: &'a DestinationSet,
        validator: &'a AuthorValidator,
        registry: &'a dyn RegistryStore,
        emitter: &'a E,
    ) -> Self {
        Self {
            destinations,
            validator,
            mru: MruStore::new(registry),
            emitter,
            counters: InstallCounters::default(),
            flags: InstallFlags::default(),
            copied: Vec::new(),
            blocked_files: Vec::new(),
        }
    }

    #[must_use]
    pub fn counters(&self) -> InstallCounters {
        self.counters
    }

    #[must_use]
    pub fn flags(&self) -> &InstallFlags {
        &self.flags
    }

    /// Install the ten base templates found in `base_dir`.
    ///
    /// Sources are matched with the same rule as `base_template`, so a
    /// `Normal.DOTX` in the payload installs as `Normal.dotx`. A missing
    /// source counts as an error, a refused author as blocked. Neither
    /// stops the pass.
    pub fn install_base_templates(&mut self, base_dir: &Path) -> InstallCounters {
        let payload = match template_files(base_dir) {
            Ok(files) => files,
            Err(err) => {
                self.emitter.emit_warning_with_context(
                    format!("cannot list payload folder {}", base_dir.display()),
                    err.to_string(),
                );
                Vec::new()
            }
        };

        for base in &BASE_TEMPLATES {
            let Some(source) = find_base_source(&payload, base) else {
                self.counters.record_error();
                self.emitter.emit(AppEvent::Copy(CopyEvent::SourceMissing {
                    stage: CopyStage::Base,
                    source: base_dir.join(base.file_name),
                }));
                continue;
            };
            let Some(dir) = self.destinations.get(base.destination) else {
                self.emit_no_destination(CopyStage::Base, base.file_name);
                continue;
            };
            let destination = dir.join(base.file_name);
            if self.copy_template(CopyStage::Base, source, base.file_name, &destination) {
                self.flags.record_copy(base.destination, &destination);
                self.flags.mark_app(base.app);
                self.mru.write_entry(base.app, &destination, self.emitter);
            }
        }

        self.emitter
            .emit(AppEvent::Install(InstallEvent::BaseTemplatesProcessed {
                files: self.counters.files,
                errors: self.counters.errors,
                blocked: self.counters.blocked,
            }));
        self.counters
    }

    /// Install every other supported template in `base_dir`, routed by extension.
    ///
    /// Files without a destination are skipped without touching the counters.
    pub fn copy_custom_templates(&mut self, base_dir: &Path) -> InstallCounters {
        let files = match template_files(base_dir) {
            Ok(files) => files,
            Err(err) => {
                self.counters.record_error();
                self.emitter.emit_warning_with_context(
                    format!("cannot list payload folder {}", base_dir.display()),
                    err.to_string(),
                );
                return self.counters;
            }
        };

        for template in files.into_iter().filter_map(TemplateFile::from_path) {
            if template.is_base() {
                continue;
            }
            let Some((role, dir)) = self.destinations.resolve_destination(&template.file_name)
            else {
                self.emit_no_destination(CopyStage::Custom, &template.file_name);
                continue;
            };
            let destination = dir.join(&template.file_name);
            if !self.copy_template(
                CopyStage::Custom,
                &template.path,
                &template.file_name,
                &destination,
            ) {
                continue;
            }

            self.flags.record_copy(role, &destination);
            if let Some(app) = template.extension.app() {
                self.flags.mark_app(app);
                self.mru.write_entry(app, &destination, self.emitter);
            }
        }
        self.counters
    }

    /// Validate, back up and copy one file. Returns whether it was copied.
    fn copy_template(
        &mut self,
        stage: CopyStage,
        source: &Path,
        file_name: &str,
        destination: &Path,
    ) -> bool {
        let verdict = self.validator.check(source, self.emitter);
        if !verdict.is_allowed() {
            self.counters.record_blocked();
            self.blocked_files.push(source.to_path_buf());
            return false;
        }

        backup_existing(destination, self.emitter);

        match copy_preserving(source, destination) {
            Ok(_) => {
                self.counters.record_copied();
                self.copied.push(destination.to_path_buf());
                self.emitter.emit(AppEvent::Copy(CopyEvent::Copied {
                    stage,
                    file: file_name.to_string(),
                    destination: destination.to_path_buf(),
                }));
                true
            }
            Err(err) => {
                self.counters.record_error();
                let error = InstallError::copy_failed(file_name, destination, &err);
                self.emitter.emit(AppEvent::Copy(CopyEvent::Failed {
                    stage,
                    file: file_name.to_string(),
                    destination: destination.to_path_buf(),
                    failure: FailureContext::from_error(&error),
                }));
                false
            }
        }
    }

    fn emit_no_destination(&self, stage: CopyStage, file_name: &str) {
        self.emitter.emit(AppEvent::Copy(CopyEvent::NoDestination {
            stage,
            file: file_name.to_string(),
        }));
    }

    /// Close the run and build its report
    #[must_use]
    pub fn into_report(self, payload_dir: PathBuf) -> InstallReport {
        self.emitter.emit(AppEvent::Install(InstallEvent::Completed {
            files: self.counters.files,
            errors: self.counters.errors,
            blocked: self.counters.blocked,
        }));
        InstallReport {
            payload_dir,
            counters: self.counters,
            copied: self.copied,
            blocked_files: self.blocked_files,
            flags: self.flags,
            duration_ms: 0,
        }
    }
}

/// Payload file that names `base`; the first in listing order wins
fn find_base_source<'p>(payload: &'p [PathBuf], base: &BaseTemplate) -> Option<&'p Path> {
    payload
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(base_template)
                .is_some_and(|found| found.file_name == base.file_name)
        })
        .map(PathBuf::as_path)
}
