//! Locating the payload folder a run reads templates from

use officetpl_errors::ConfigError;
use officetpl_events::{AppEvent, EventEmitter, PathsEvent};
use officetpl_platform::fs::contains_extension_prefix;
use officetpl_platform::path_in_appdata;
use std::path::{Path, PathBuf};

/// Subfolders probed below the working directory and its parent
pub const PAYLOAD_SUBDIRS: [&str; 3] = ["payload", "templates", "extracted"];

const TEMPLATE_EXTENSION_PREFIXES: [&str; 3] = ["dot", "pot", "xlt"];

/// First candidate folder holding template-like files, else `working_dir`.
///
/// Candidates are the folder itself and its `payload`, `templates` and
/// `extracted` subfolders, then the same four under the parent.
#[must_use]
pub fn find_payload_dir(working_dir: &Path) -> PathBuf {
    let roots = std::iter::once(working_dir).chain(
        working_dir
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty() && *parent != working_dir),
    );
    for root in roots {
        let candidates = std::iter::once(root.to_path_buf())
            .chain(PAYLOAD_SUBDIRS.iter().map(|sub| root.join(sub)));
        for candidate in candidates {
            if contains_extension_prefix(&candidate, &TEMPLATE_EXTENSION_PREFIXES) {
                return candidate;
            }
        }
    }
    working_dir.to_path_buf()
}

/// Resolve the payload folder for a run started in `working_dir`.
///
/// # Errors
///
/// - [`ConfigError::PayloadNotFound`] if `working_dir` is not a directory
/// - [`ConfigError::PayloadInAppData`] if nothing better than the working
///   directory was found and it lies inside `appdata`, which means the tool
///   was started from its own install location without a payload
pub fn resolve_payload_dir<E: EventEmitter + ?Sized>(
    working_dir: &Path,
    appdata: &Path,
    emitter: &E,
) -> Result<PathBuf, ConfigError> {
    if !working_dir.is_dir() {
        return Err(ConfigError::PayloadNotFound {
            path: working_dir.display().to_string(),
        });
    }
    let payload_dir = find_payload_dir(working_dir);
    if payload_dir == working_dir && path_in_appdata(&payload_dir, appdata) {
        return Err(ConfigError::PayloadInAppData {
            path: payload_dir.display().to_string(),
        });
    }
    emitter.emit(AppEvent::Paths(PathsEvent::PayloadResolved {
        working_dir: working_dir.to_path_buf(),
        payload_dir: payload_dir.clone(),
    }));
    Ok(payload_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use officetpl_events::NullEmitter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn working_dir_with_templates_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Normal.dotx"), b"").unwrap();
        fs::create_dir(dir.path().join("payload")).unwrap();
        fs::write(dir.path().join("payload").join("Blank.potx"), b"").unwrap();
        assert_eq!(find_payload_dir(dir.path()), dir.path());
    }

    #[test]
    fn subfolders_are_tried_in_order() {
        let dir = TempDir::new().unwrap();
        for sub in ["templates", "extracted"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("Book.xltx"), b"").unwrap();
        }
        assert_eq!(find_payload_dir(dir.path()), dir.path().join("templates"));
    }

    #[test]
    fn parent_payload_is_found_from_a_child_folder() {
        let dir = TempDir::new().unwrap();
        let child = dir.path().join("bin");
        fs::create_dir(&child).unwrap();
        fs::create_dir(dir.path().join("payload")).unwrap();
        fs::write(dir.path().join("payload").join("Report.dotm"), b"").unwrap();
        assert_eq!(find_payload_dir(&child), dir.path().join("payload"));
    }

    #[test]
    fn empty_folder_falls_back_to_itself() {
        let dir = TempDir::new().unwrap();
        let child = dir.path().join("empty");
        fs::create_dir(&child).unwrap();
        assert_eq!(find_payload_dir(&child), child);
    }

    #[test]
    fn bare_run_inside_appdata_is_fatal() {
        let appdata = TempDir::new().unwrap();
        let tool_dir = appdata.path().join("Tool");
        fs::create_dir(&tool_dir).unwrap();

        let err = resolve_payload_dir(&tool_dir, appdata.path(), &NullEmitter).unwrap_err();
        assert!(matches!(err, ConfigError::PayloadInAppData { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn payload_subfolder_inside_appdata_is_accepted() {
        let appdata = TempDir::new().unwrap();
        let payload = appdata.path().join("payload");
        fs::create_dir(&payload).unwrap();
        fs::write(payload.join("Normal.dotx"), b"").unwrap();
        let resolved = resolve_payload_dir(appdata.path(), appdata.path(), &NullEmitter);
        assert_eq!(resolved.unwrap(), payload);
    }

    #[test]
    fn missing_working_dir_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = resolve_payload_dir(&dir.path().join("gone"), dir.path(), &NullEmitter)
            .unwrap_err();
        assert!(matches!(err, ConfigError::PayloadNotFound { .. }));
    }
}
