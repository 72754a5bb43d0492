//! Reading the creator from a template's core properties part

use officetpl_errors::AuthorError;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive entry holding the document properties
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Dublin Core elements namespace
pub const DUBLIN_CORE_NS: &str = "http://purl.org/dc/elements/1.1/";

fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Read the trimmed, non-empty creator of a template.
///
/// # Errors
///
/// - [`AuthorError::PathNotFound`] if the file does not exist
/// - [`AuthorError::ArchiveUnreadable`] if it is not a readable ZIP or the XML is malformed
/// - [`AuthorError::MetadataMissing`] if the archive has no core properties part
/// - [`AuthorError::AuthorMissing`] if the creator is absent or blank
pub fn extract_author(path: &Path) -> Result<String, AuthorError> {
    let file_name = file_label(path);
    if !path.exists() {
        return Err(AuthorError::PathNotFound {
            path: path.display().to_string(),
        });
    }
    let unreadable = |message: String| AuthorError::ArchiveUnreadable {
        file: file_name.clone(),
        message,
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| unreadable(e.to_string()))?;
    let mut core = archive.by_name(CORE_PROPERTIES_PART).map_err(|e| match e {
        ZipError::FileNotFound => AuthorError::MetadataMissing {
            file: file_name.clone(),
        },
        other => unreadable(other.to_string()),
    })?;
    let mut xml = String::new();
    core.read_to_string(&mut xml)
        .map_err(|e| unreadable(e.to_string()))?;

    match parse_creator(&xml).map_err(unreadable)? {
        Some(author) => Ok(author),
        None => Err(AuthorError::AuthorMissing { file: file_name }),
    }
}

fn is_creator(ns: &ResolveResult<'_>, local_name: &[u8]) -> bool {
    if local_name != b"creator" {
        return false;
    }
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == DUBLIN_CORE_NS.as_bytes(),
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

/// Creator of a core properties document.
///
/// Only direct children of the root are considered, either `dc:creator` or
/// an unqualified `creator`. The first one with non-blank text wins.
///
/// # Errors
///
/// Returns the parser message if the XML is malformed.
pub fn parse_creator(xml: &str) -> Result<Option<String>, String> {
    let mut reader = NsReader::from_str(xml);
    let mut depth = 0usize;
    let mut capturing = false;
    let mut text = String::new();

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
        match event {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 && is_creator(&ns, start.local_name().as_ref()) {
                    capturing = true;
                    text.clear();
                }
            }
            Event::Text(chunk) if capturing => {
                text.push_str(&chunk.unescape().map_err(|e| e.to_string())?);
            }
            Event::CData(chunk) if capturing => {
                text.push_str(&String::from_utf8_lossy(&chunk.into_inner()));
            }
            Event::End(_) => {
                if capturing && depth == 2 {
                    capturing = false;
                    let author = text.trim();
                    if !author.is_empty() {
                        return Ok(Some(author.to_string()));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>Quarterly</dc:title>
  <dc:creator> www.grada.cc </dc:creator>
  <cp:lastModifiedBy>someone else</cp:lastModifiedBy>
</cp:coreProperties>"#;

    #[test]
    fn reads_dublin_core_creator() {
        assert_eq!(parse_creator(CORE).unwrap().as_deref(), Some("www.grada.cc"));
    }

    #[test]
    fn accepts_unqualified_creator_and_entities() {
        let xml = "<coreProperties><creator>A &amp; B</creator></coreProperties>";
        assert_eq!(parse_creator(xml).unwrap().as_deref(), Some("A & B"));
    }

    #[test]
    fn ignores_nested_or_foreign_creators() {
        let xml = r#"<root xmlns:x="urn:other"><x:creator>nope</x:creator><group><creator>deep</creator></group></root>"#;
        assert_eq!(parse_creator(xml).unwrap(), None);
    }

    #[test]
    fn blank_creator_is_absent() {
        let xml = r#"<cp:coreProperties xmlns:cp="urn:cp" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:creator>  </dc:creator><dc:creator/></cp:coreProperties>"#;
        assert_eq!(parse_creator(xml).unwrap(), None);
    }

    #[test]
    fn malformed_xml_is_reported() {
        assert!(parse_creator("<a><dc:creator>x</b></a>").is_err());
    }
}
