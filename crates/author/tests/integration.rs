//! Author checks against real template containers

use officetpl_author::{check_author, extract_author, AuthorValidator, CORE_PROPERTIES_PART};
use officetpl_errors::AuthorError;
use officetpl_events::{AppEvent, AuthorEvent, NullEmitter};
use officetpl_types::AuthorFinding;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn write_template(dir: &Path, name: &str, creator: &str) -> PathBuf {
    let path = dir.join(name);
    let mut writer = zip::ZipWriter::new(fs::File::create(&path).unwrap());
    writer
        .start_file(CORE_PROPERTIES_PART, SimpleFileOptions::default())
        .unwrap();
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:creator>{creator}</dc:creator></cp:coreProperties>"#
    )
    .unwrap();
    writer.finish().unwrap();
    path
}

#[test]
fn folder_with_valid_and_authorless_templates_prints_true() {
    let dir = TempDir::new().unwrap();
    write_template(dir.path(), "Valid.dotx", "www.grada.cc");
    write_template(dir.path(), "Authorless.potx", "");

    let result = check_author(dir.path(), &["www.grada.cc".to_string()], true, &NullEmitter);
    assert_eq!(result.as_cli_output(), "TRUE");
    assert_eq!(result.findings().len(), 2);
    assert!(result
        .findings()
        .iter()
        .any(|f| matches!(f, AuthorFinding::Author { file, .. } if file == "Valid.dotx")));
    assert!(result
        .findings()
        .iter()
        .any(|f| matches!(f, AuthorFinding::Empty { file } if file == "Authorless.potx")));
}

#[test]
fn configured_allowlist_replaces_defaults() {
    let dir = TempDir::new().unwrap();
    let file = write_template(dir.path(), "Memo.dotx", "Acme Corp");

    let defaults = AuthorValidator::new(Vec::<String>::new(), true);
    assert!(!defaults.check(&file, &NullEmitter).is_allowed());

    let custom = AuthorValidator::new(officetpl_types::parse_author_list("acme corp; other"), true);
    let result = custom.check(&file, &NullEmitter);
    assert!(result.is_allowed());
    assert_eq!(result.as_cli_output(), "TRUE");
}

#[test]
fn blocked_file_emits_blocked_event() {
    let dir = TempDir::new().unwrap();
    let file = write_template(dir.path(), "custom.dotx", "evil.com");
    let (tx, mut rx) = officetpl_events::channel();

    let result = check_author(&file, &[], true, &tx);
    assert!(!result.is_allowed());

    let mut blocked = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let AppEvent::Author(AuthorEvent::Blocked { path, .. }) = message.event {
            blocked.push(path);
        }
    }
    assert_eq!(blocked, vec![file]);
}

#[test]
fn extraction_distinguishes_failure_reasons() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        extract_author(&dir.path().join("gone.dotx")),
        Err(AuthorError::PathNotFound { .. })
    ));

    let blank = write_template(dir.path(), "Blank.dotx", " ");
    assert!(matches!(
        extract_author(&blank),
        Err(AuthorError::AuthorMissing { .. })
    ));

    let corrupt = dir.path().join("Corrupt.xltx");
    fs::write(&corrupt, b"PK\x03\x04 truncated").unwrap();
    assert!(matches!(
        extract_author(&corrupt),
        Err(AuthorError::ArchiveUnreadable { .. })
    ));
}
