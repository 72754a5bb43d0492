//! Filesystem helpers used by the install and uninstall engines
//!
//! Copies create missing parents and carry the source timestamps over to the
//! destination. Deletes report whether the file is still present afterwards.

use filetime::FileTime;
use officetpl_types::TemplateExtension;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Create `path` and all of its parents
///
/// # Errors
///
/// Returns an error if any directory cannot be created.
pub fn ensure_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Copy `source` to `destination`, creating parent directories and keeping
/// the permissions and access/modification times of the source
///
/// # Errors
///
/// Returns an error if the parents cannot be created, the copy fails or the
/// timestamps cannot be applied.
pub fn copy_preserving(source: &Path, destination: &Path) -> io::Result<u64> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let bytes = fs::copy(source, destination)?;
    let metadata = fs::metadata(source)?;
    let accessed = FileTime::from_last_access_time(&metadata);
    let modified = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(destination, accessed, modified)?;
    Ok(bytes)
}

/// Outcome of a checked delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Nothing existed at the path
    NotPresent,
    /// The file was removed
    Removed,
    /// The unlink reported success but the file is still there (typically locked by Office)
    Persisted,
}

/// Delete a file if it exists and re-check its presence afterwards
///
/// # Errors
///
/// Returns an error if the file exists and the unlink fails.
pub fn remove_file_checked(path: &Path) -> io::Result<RemoveOutcome> {
    if !path.exists() {
        return Ok(RemoveOutcome::NotPresent);
    }
    fs::remove_file(path)?;
    if path.exists() {
        Ok(RemoveOutcome::Persisted)
    } else {
        Ok(RemoveOutcome::Removed)
    }
}

/// Sorted names of regular files in `dir`; `Ok(None)` when the directory is absent
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn list_files(dir: &Path) -> io::Result<Option<Vec<String>>> {
    if !dir.exists() {
        return Ok(None);
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(Some(names))
}

/// Supported template files directly inside `dir`.
///
/// Ordered by extension (`.dotx .dotm .potx .potm .xltx .xltm .thmx`) and by
/// file name within an extension. Extension matching ignores case.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn template_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(extension) = TemplateExtension::from_file_name(&name) {
            found.push((extension, name.to_lowercase(), entry.path()));
        }
    }
    found.sort();
    Ok(found.into_iter().map(|(_, _, path)| path).collect())
}

/// Whether `dir` directly contains a file whose extension starts with one of `prefixes`
#[must_use]
pub fn contains_extension_prefix(dir: &Path, prefixes: &[&str]) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.filter_map(Result::ok).any(|entry| {
        entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                prefixes.iter().any(|prefix| ext.starts_with(prefix))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copy_creates_parents_and_keeps_mtime() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Blank.potx");
        fs::write(&source, b"pptx").unwrap();
        let old = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&source, old).unwrap();

        let destination = dir.path().join("a").join("b").join("Blank.potx");
        assert_eq!(copy_preserving(&source, &destination).unwrap(), 4);

        let meta = fs::metadata(&destination).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), old);
    }

    #[test]
    fn checked_remove_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Book.xltx");
        assert_eq!(
            remove_file_checked(&target).unwrap(),
            RemoveOutcome::NotPresent
        );
        fs::write(&target, b"x").unwrap();
        assert_eq!(remove_file_checked(&target).unwrap(), RemoveOutcome::Removed);
        assert!(!target.exists());
    }

    #[test]
    fn list_files_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.dotx"), b"").unwrap();
        fs::write(dir.path().join("a.potx"), b"").unwrap();
        fs::create_dir(dir.path().join("Backups")).unwrap();
        assert_eq!(
            list_files(dir.path()).unwrap(),
            Some(vec!["a.potx".to_string(), "b.dotx".to_string()])
        );
        assert_eq!(list_files(&dir.path().join("missing")).unwrap(), None);
    }

    #[test]
    fn template_files_follow_extension_order() {
        let dir = TempDir::new().unwrap();
        for name in ["z.dotx", "Theme.thmx", "b.POTX", "a.potx", "Report.DOTM", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<_> = template_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["z.dotx", "Report.DOTM", "a.potx", "b.POTX", "Theme.thmx"]);
    }

    #[test]
    fn extension_prefix_detection() {
        let dir = TempDir::new().unwrap();
        assert!(!contains_extension_prefix(dir.path(), &["dot"]));
        fs::write(dir.path().join("Letter.DOTX"), b"").unwrap();
        assert!(contains_extension_prefix(dir.path(), &["pot", "dot"]));
        assert!(!contains_extension_prefix(&dir.path().join("none"), &["dot"]));
    }
}
