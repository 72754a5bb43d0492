use serde::{Deserialize, Serialize};

use officetpl_types::OfficeApp;

use super::FailureContext;

/// Recent-templates list maintenance events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MruEvent {
    /// Registry is not available; MRU maintenance skipped
    Unavailable { app: OfficeApp },

    /// Write of a new front entry starting across the listed keys
    UpdateStarted {
        app: OfficeApp,
        path: String,
        keys: Vec<String>,
    },

    /// One `Item N` value written
    EntryWritten {
        key: String,
        index: usize,
        path: String,
    },

    /// A key finished updating
    KeyUpdated { key: String, path: String },

    /// Exclusion rewrite starting for an application
    ClearStarted {
        app: OfficeApp,
        targets: Vec<String>,
        keys: Vec<String>,
    },

    /// A key was rewritten without the targets
    KeyCleared {
        key: String,
        removed: usize,
        kept: usize,
    },

    /// A key could not be processed; other keys continue
    KeyFailed {
        key: String,
        failure: FailureContext,
    },
}
