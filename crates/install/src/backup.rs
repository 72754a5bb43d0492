//! Backup-before-overwrite

use chrono::{DateTime, Local};
use officetpl_errors::InstallError;
use officetpl_events::{AppEvent, BackupEvent, EventEmitter, FailureContext};
use officetpl_platform::fs::{copy_preserving, ensure_directory};
use std::path::{Path, PathBuf};

/// Folder created beside a target to hold its backups
pub const BACKUP_DIR: &str = "Backups";

/// Timestamp prefix of a backup file name; minute granularity
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H%M";

/// Where a backup of `target` taken at `at` is stored
#[must_use]
pub fn backup_path(target: &Path, at: DateTime<Local>) -> Option<PathBuf> {
    let name = target.file_name()?.to_string_lossy();
    let parent = target.parent()?;
    Some(parent.join(BACKUP_DIR).join(format!(
        "{} - {name}",
        at.format(BACKUP_TIMESTAMP_FORMAT)
    )))
}

/// Copy an existing `target` into its `Backups` folder, stamped with the current minute.
///
/// See [`backup_existing_at`].
pub fn backup_existing<E: EventEmitter + ?Sized>(target: &Path, emitter: &E) -> Option<PathBuf> {
    backup_existing_at(target, Local::now(), emitter)
}

/// Copy an existing `target` into its `Backups` folder, stamped with `at`.
///
/// Returns the backup holding the file's content, or `None` when there was
/// nothing to back up or the copy failed. A backup already present for the
/// same minute is left untouched.
pub fn backup_existing_at<E: EventEmitter + ?Sized>(
    target: &Path,
    at: DateTime<Local>,
    emitter: &E,
) -> Option<PathBuf> {
    if !target.is_file() {
        return None;
    }
    let backup = backup_path(target, at)?;

    if backup.exists() {
        emitter.emit(AppEvent::Backup(BackupEvent::AlreadyExists {
            target: target.to_path_buf(),
            backup: backup.clone(),
        }));
        return Some(backup);
    }

    let result = backup
        .parent()
        .map_or(Ok(()), ensure_directory)
        .and_then(|()| copy_preserving(target, &backup));

    match result {
        Ok(_) => {
            emitter.emit(AppEvent::Backup(BackupEvent::Created {
                target: target.to_path_buf(),
                backup: backup.clone(),
            }));
            Some(backup)
        }
        Err(err) => {
            let error = InstallError::BackupFailed {
                path: target.display().to_string(),
                message: err.to_string(),
            };
            emitter.emit(AppEvent::Backup(BackupEvent::Failed {
                target: target.to_path_buf(),
                failure: FailureContext::from_error(&error),
            }));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use officetpl_events::NullEmitter;
    use std::fs;
    use tempfile::TempDir;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 12, 5, 42).unwrap()
    }

    #[test]
    fn backup_name_uses_minute_stamp() {
        let path = backup_path(Path::new("/t/Normal.dotx"), noon()).unwrap();
        assert_eq!(path, Path::new("/t/Backups/2024.03.07.1205 - Normal.dotx"));
    }

    #[test]
    fn missing_target_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Normal.dotx");
        assert!(backup_existing(&target, &NullEmitter).is_none());
        assert!(!dir.path().join(BACKUP_DIR).exists());
    }

    #[test]
    fn backup_copies_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Book.xltx");
        fs::write(&target, b"old book").unwrap();

        let backup = backup_existing_at(&target, noon(), &NullEmitter).unwrap();
        assert_eq!(fs::read(&backup).unwrap(), b"old book");
        assert!(target.exists());
    }

    #[test]
    fn same_minute_backup_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Normal.dotx");
        fs::write(&target, b"first").unwrap();
        backup_existing_at(&target, noon(), &NullEmitter).unwrap();

        fs::write(&target, b"second").unwrap();
        let (tx, mut rx) = officetpl_events::channel();
        let backup = backup_existing_at(&target, noon(), &tx).unwrap();

        assert_eq!(fs::read(&backup).unwrap(), b"first");
        assert_eq!(fs::read_dir(dir.path().join(BACKUP_DIR)).unwrap().count(), 1);
        let message = rx.try_recv().unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Backup(BackupEvent::AlreadyExists { .. })
        ));
    }
}
