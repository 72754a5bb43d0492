use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path resolution and folder inspection events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathsEvent {
    /// Every resolved template directory with its label
    Resolved { entries: Vec<(String, PathBuf)> },

    /// Raw registry values consulted during resolution
    RegistrySources {
        entries: Vec<(String, Option<String>)>,
    },

    /// Payload directory chosen for the run
    PayloadResolved {
        working_dir: PathBuf,
        payload_dir: PathBuf,
    },

    /// Files present in a template folder; `None` when the folder is absent
    FolderContents {
        label: String,
        path: PathBuf,
        files: Option<Vec<String>>,
    },

    /// A folder could not be listed
    FolderUnreadable {
        label: String,
        path: PathBuf,
        error: String,
    },
}
