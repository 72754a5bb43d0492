#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Template installation and removal for officetpl
//!
//! This crate copies payload templates into the per-user Office folders,
//! removes them again, and keeps the recent-templates lists in step with
//! both. Every per-file problem is reported as an event and tallied; none
//! of them aborts a run.

mod backup;
mod installer;
mod payload;
mod uninstaller;

pub use backup::{backup_existing, backup_existing_at, backup_path, BACKUP_DIR, BACKUP_TIMESTAMP_FORMAT};
pub use installer::InstallEngine;
pub use payload::{find_payload_dir, resolve_payload_dir, PAYLOAD_SUBDIRS};
pub use uninstaller::UninstallEngine;
