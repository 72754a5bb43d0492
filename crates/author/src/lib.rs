#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Template author validation
//!
//! Office templates are ZIP containers. The author is the Dublin Core
//! `creator` element of `docProps/core.xml`; it is compared without regard
//! to case against an allowlist. Single files are gated, directories are
//! only reported on.

mod metadata;

pub use metadata::{extract_author, parse_creator, CORE_PROPERTIES_PART, DUBLIN_CORE_NS};

use officetpl_errors::AuthorError;
use officetpl_events::{AppEvent, AuthorEvent, EventEmitter, FailureContext};
use officetpl_types::{
    default_allowed_authors, normalize_authors, AuthorCheckResult, AuthorFinding,
    TemplateExtension,
};
use std::path::Path;

/// Allowlist and switch shared by every check in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorValidator {
    allowed: Vec<String>,
    validation_enabled: bool,
}

impl AuthorValidator {
    /// Build a validator; an allowlist that is empty after trimming falls back to the defaults
    #[must_use]
    pub fn new<I, S>(allowed: I, validation_enabled: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = normalize_authors(allowed);
        if allowed.is_empty() {
            allowed = default_allowed_authors();
        }
        Self {
            allowed,
            validation_enabled,
        }
    }

    #[must_use]
    pub fn allowed_authors(&self) -> &[String] {
        &self.allowed
    }

    #[must_use]
    pub fn validation_enabled(&self) -> bool {
        self.validation_enabled
    }

    /// Case-insensitive exact match against the allowlist
    #[must_use]
    pub fn is_allowed(&self, author: &str) -> bool {
        let author = author.trim();
        self.allowed
            .iter()
            .any(|candidate| candidate.to_lowercase() == author.to_lowercase())
    }

    /// Check a file or report on a directory
    pub fn check<E: EventEmitter + ?Sized>(&self, target: &Path, emitter: &E) -> AuthorCheckResult {
        if !target.exists() {
            let err = AuthorError::PathNotFound {
                path: target.display().to_string(),
            };
            let result = AuthorCheckResult::failed(err.to_string());
            emit_checked(target, &result, emitter);
            return result;
        }

        if target.is_dir() {
            return scan_directory(target, emitter);
        }

        let result = self.check_file(target, emitter);
        emit_checked(target, &result, emitter);
        result
    }

    fn check_file<E: EventEmitter + ?Sized>(&self, target: &Path, emitter: &E) -> AuthorCheckResult {
        if !self.validation_enabled {
            return AuthorCheckResult::allowed("Author validation disabled.", Vec::new());
        }
        if is_theme(target) {
            return AuthorCheckResult::allowed("Author validation skipped for themes.", Vec::new());
        }

        match extract_author(target) {
            Ok(author) if self.is_allowed(&author) => {
                emit_inspected(target, Some(author.clone()), emitter);
                AuthorCheckResult::allowed("Author approved.", vec![author])
            }
            Ok(author) => {
                emit_inspected(target, Some(author.clone()), emitter);
                let err = AuthorError::Blocked {
                    file: target.display().to_string(),
                    author: author.clone(),
                };
                emit_blocked(target, &err, emitter);
                AuthorCheckResult::denied(err.to_string(), vec![author])
            }
            Err(err @ AuthorError::AuthorMissing { .. }) => {
                emit_inspected(target, None, emitter);
                emit_blocked(target, &err, emitter);
                AuthorCheckResult::denied(err.to_string(), Vec::new())
            }
            Err(err) => {
                emit_unreadable(target, &err, emitter);
                AuthorCheckResult::failed(err.to_string())
            }
        }
    }
}

/// Check `target` against `allowed_authors`.
///
/// A missing target is an error result. A directory is scanned and always
/// reported as allowed. A single file is allowed when validation is off, when
/// it is a theme, or when its author is on the allowlist.
pub fn check_author<E: EventEmitter + ?Sized>(
    target: &Path,
    allowed_authors: &[String],
    validation_enabled: bool,
    emitter: &E,
) -> AuthorCheckResult {
    AuthorValidator::new(allowed_authors, validation_enabled).check(target, emitter)
}

fn is_theme(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(TemplateExtension::from_file_name)
        .is_some_and(TemplateExtension::is_theme)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn scan_directory<E: EventEmitter + ?Sized>(target: &Path, emitter: &E) -> AuthorCheckResult {
    let files = match officetpl_platform::fs::template_files(target) {
        Ok(files) => files,
        Err(err) => {
            let err = AuthorError::DirectoryUnreadable {
                path: target.display().to_string(),
                message: err.to_string(),
            };
            let result = AuthorCheckResult::failed(err.to_string());
            emit_checked(target, &result, emitter);
            return result;
        }
    };

    let mut authors = Vec::new();
    let mut findings = Vec::with_capacity(files.len());
    for file in &files {
        let name = file_label(file);
        if is_theme(file) {
            emitter.emit(AppEvent::Author(AuthorEvent::ThemeSkipped { file: name.clone() }));
            findings.push(AuthorFinding::Skipped { file: name });
            continue;
        }
        match extract_author(file) {
            Ok(author) => {
                emit_inspected(file, Some(author.clone()), emitter);
                authors.push(author.clone());
                findings.push(AuthorFinding::Author { file: name, author });
            }
            Err(AuthorError::AuthorMissing { .. }) => {
                emit_inspected(file, None, emitter);
                findings.push(AuthorFinding::Empty { file: name });
            }
            Err(err) => {
                emit_unreadable(file, &err, emitter);
                findings.push(AuthorFinding::Unreadable {
                    file: name,
                    reason: err.to_string(),
                });
            }
        }
    }

    let message = if findings.is_empty() {
        format!("No templates found in \"{}\".", target.display())
    } else if authors.is_empty() {
        format!("No authors found in \"{}\".", target.display())
    } else {
        format!("Authors listed for folder \"{}\".", target.display())
    };
    let result = AuthorCheckResult::allowed(message, authors).with_findings(findings);
    emit_checked(target, &result, emitter);
    result
}

fn emit_inspected<E: EventEmitter + ?Sized>(file: &Path, author: Option<String>, emitter: &E) {
    emitter.emit(AppEvent::Author(AuthorEvent::FileInspected {
        file: file_label(file),
        author,
    }));
}

fn emit_blocked<E: EventEmitter + ?Sized>(file: &Path, err: &AuthorError, emitter: &E) {
    emitter.emit(AppEvent::Author(AuthorEvent::Blocked {
        path: file.to_path_buf(),
        message: err.to_string(),
    }));
}

fn emit_unreadable<E: EventEmitter + ?Sized>(file: &Path, err: &AuthorError, emitter: &E) {
    emitter.emit(AppEvent::Author(AuthorEvent::Unreadable {
        file: file_label(file),
        failure: FailureContext::from_error(err),
    }));
}

fn emit_checked<E: EventEmitter + ?Sized>(target: &Path, result: &AuthorCheckResult, emitter: &E) {
    emitter.emit(AppEvent::Author(AuthorEvent::Checked {
        target: target.to_path_buf(),
        allowed: result.is_allowed(),
        error: result.is_error(),
        message: result.message().to_string(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use officetpl_events::NullEmitter;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn template(dir: &Path, name: &str, creator: Option<&str>) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut writer = zip::ZipWriter::new(fs::File::create(&path).unwrap());
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        if let Some(creator) = creator {
            writer
                .start_file(CORE_PROPERTIES_PART, SimpleFileOptions::default())
                .unwrap();
            write!(
                writer,
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>T</dc:title><dc:creator>{creator}</dc:creator></cp:coreProperties>"#
            )
            .unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn validator() -> AuthorValidator {
        AuthorValidator::new(["www.grada.cc", "www.gradaz.com"], true)
    }

    #[test]
    fn allowlist_match_ignores_case() {
        let dir = TempDir::new().unwrap();
        let file = template(dir.path(), "Letter.dotx", Some("WWW.GRADA.CC"));
        let result = validator().check(&file, &NullEmitter);
        assert!(result.is_allowed());
        assert!(!result.is_error());
        assert_eq!(result.authors(), vec!["WWW.GRADA.CC".to_string()]);
    }

    #[test]
    fn foreign_author_is_blocked_without_error() {
        let dir = TempDir::new().unwrap();
        let file = template(dir.path(), "custom.dotx", Some("evil.com"));
        let result = validator().check(&file, &NullEmitter);
        assert!(!result.is_allowed());
        assert!(!result.is_error());
        assert!(result.message().contains("evil.com"));
    }

    #[test]
    fn empty_creator_is_denied_but_not_an_error() {
        let dir = TempDir::new().unwrap();
        let file = template(dir.path(), "Empty.potx", Some("   "));
        let result = validator().check(&file, &NullEmitter);
        assert!(!result.is_allowed());
        assert!(!result.is_error());
        assert!(result.authors().is_empty());
    }

    #[test]
    fn missing_core_part_and_bad_archive_are_errors() {
        let dir = TempDir::new().unwrap();
        let no_core = template(dir.path(), "Bare.xltx", None);
        let result = validator().check(&no_core, &NullEmitter);
        assert!(!result.is_allowed() && result.is_error());
        assert!(result.message().contains("core.xml"));

        let garbage = dir.path().join("Broken.dotx");
        fs::write(&garbage, b"not a zip").unwrap();
        let result = validator().check(&garbage, &NullEmitter);
        assert!(!result.is_allowed() && result.is_error());
    }

    #[test]
    fn themes_and_disabled_validation_pass() {
        let dir = TempDir::new().unwrap();
        let theme = dir.path().join("Brand.thmx");
        fs::write(&theme, b"not even a zip").unwrap();
        assert!(validator().check(&theme, &NullEmitter).is_allowed());
        assert!(AuthorValidator::new(["x"], false).check(&theme, &NullEmitter).is_allowed());

        let file = template(dir.path(), "custom.dotx", Some("evil.com"));
        let lenient = AuthorValidator::new(Vec::<String>::new(), false);
        assert!(lenient.check(&file, &NullEmitter).is_allowed());
        assert_eq!(lenient.allowed_authors().len(), 2);
    }

    #[test]
    fn missing_target_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = validator().check(&dir.path().join("nope.dotx"), &NullEmitter);
        assert!(result.is_error());
        assert_eq!(result.as_cli_output(), "FALSE");
    }

    #[test]
    fn unlistable_directory_is_reported_as_listing_failure() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("removed");
        let result = scan_directory(&gone, &NullEmitter);
        assert!(!result.is_allowed() && result.is_error());
        assert!(result.message().starts_with("cannot list"));
        assert!(!result.message().contains("core.xml"));
    }

    #[test]
    fn directory_scan_reports_every_file() {
        let dir = TempDir::new().unwrap();
        template(dir.path(), "a.dotx", Some("www.grada.cc"));
        template(dir.path(), "b.dotx", Some(""));
        fs::write(dir.path().join("c.thmx"), b"").unwrap();
        fs::write(dir.path().join("d.potx"), b"junk").unwrap();

        let (tx, mut rx) = officetpl_events::channel();
        let result = check_author(dir.path(), &[], true, &tx);
        assert!(result.is_allowed());
        assert!(!result.is_error());
        assert_eq!(result.authors(), vec!["www.grada.cc".to_string()]);
        assert_eq!(result.findings().len(), 4);
        assert_eq!(
            result.findings()[0],
            AuthorFinding::Author {
                file: "a.dotx".into(),
                author: "www.grada.cc".into()
            }
        );
        assert_eq!(
            result.findings()[1],
            AuthorFinding::Empty {
                file: "b.dotx".into()
            }
        );
        assert!(matches!(
            &result.findings()[2],
            AuthorFinding::Unreadable { file, .. } if file == "d.potx"
        ));
        assert_eq!(
            result.findings()[3],
            AuthorFinding::Skipped {
                file: "c.thmx".into()
            }
        );

        let mut checked = 0;
        while let Ok(message) = rx.try_recv() {
            if matches!(message.event, AppEvent::Author(AuthorEvent::Checked { .. })) {
                checked += 1;
            }
        }
        assert_eq!(checked, 1);
    }
}
