//! Recent-templates list model and registry value codec

use serde::{Deserialize, Serialize};

/// Token Office stores before the path in every `Item N` value
pub const MRU_VALUE_PREFIX: &str = "[F00000000][T01ED6D7E58D00000][O00000000]*";

/// Maximum number of entries kept per list
pub const MRU_CAPACITY: usize = 10;

/// Office versions whose roots are searched for MRU lists, newest first
pub const OFFICE_VERSIONS: [&str; 4] = ["16.0", "15.0", "14.0", "12.0"];

/// Name of an MRU registry value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MruValueName {
    Item(u32),
    Metadata(u32),
}

impl MruValueName {
    /// Parse `Item N` / `Item Metadata N`.
    ///
    /// An `Item` value with an unreadable index sorts first (index 0); a
    /// `Item Metadata` value with an unreadable index is not recognized.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix("Item Metadata ") {
            return rest.trim().parse().ok().map(Self::Metadata);
        }
        let rest = name.strip_prefix("Item ")?;
        Some(Self::Item(rest.trim().parse().unwrap_or(0)))
    }

    #[must_use]
    pub fn item(index: usize) -> String {
        format!("Item {index}")
    }

    #[must_use]
    pub fn metadata(index: usize) -> String {
        format!("Item Metadata {index}")
    }
}

/// Case-insensitive path comparison used for de-duplication and exclusion
#[must_use]
pub fn same_path(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Whether a value name belongs to the MRU item family and is cleared on rewrite
#[must_use]
pub fn is_item_value(name: &str) -> bool {
    name.starts_with("Item")
}

/// Path stored in an `Item N` value: the text after the last `*`, trimmed
#[must_use]
pub fn extract_path(raw: &str) -> Option<String> {
    let candidate = match raw.rsplit_once('*') {
        Some((_, path)) => path,
        None => raw,
    };
    let candidate = candidate.trim();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

#[must_use]
pub fn encode_item(path: &str) -> String {
    format!("{MRU_VALUE_PREFIX}{path}")
}

#[must_use]
pub fn encode_metadata(path: &str) -> String {
    let stem = display_stem(path);
    format!("<Metadata><AppSpecific><id>{path}</id><nm>{stem}</nm><du>{path}</du></AppSpecific></Metadata>")
}

/// File name without extension, treating both `\` and `/` as separators
fn display_stem(path: &str) -> &str {
    let name = path.rsplit(['\\', '/']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// One stored entry with its original registry strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MruEntry {
    pub index: u32,
    pub item: String,
    pub metadata: Option<String>,
}

impl MruEntry {
    #[must_use]
    pub fn path(&self) -> Option<String> {
        extract_path(&self.item)
    }
}

/// Ordered, de-duplicated list of template paths, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MruList {
    paths: Vec<String>,
}

impl MruList {
    /// Build from stored paths, keeping the first occurrence of each path
    #[must_use]
    pub fn from_paths<I: IntoIterator<Item = String>>(paths: I) -> Self {
        let mut list = Self::default();
        for path in paths {
            if list.len() == MRU_CAPACITY {
                break;
            }
            if !list.contains(&path) {
                list.paths.push(path);
            }
        }
        list
    }

    /// Move `path` to the front, dropping any other copy and trimming to capacity
    pub fn push_front(&mut self, path: &str) {
        self.paths.retain(|existing| !same_path(existing, path));
        self.paths.insert(0, path.to_string());
        self.paths.truncate(MRU_CAPACITY);
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|existing| same_path(existing, path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// `(Item N, Item Metadata N)` values to store, numbered from 1
    #[must_use]
    pub fn encode(&self) -> Vec<(String, String)> {
        self.paths
            .iter()
            .map(|path| (encode_item(path), encode_metadata(path)))
            .collect()
    }
}
