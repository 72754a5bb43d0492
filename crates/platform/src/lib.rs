#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Host integration for officetpl
//!
//! This crate provides the registry abstraction used by path resolution and
//! the recent-templates store, the directory resolver itself, filesystem
//! helpers, and the Office process and Explorer wrappers.

pub mod fs;
pub mod paths;
pub mod process;
pub mod registry;

pub use paths::{expand_env_vars, labelled_entries, path_in_appdata, PathResolver};
pub use process::{close_office_apps, launch_office_apps, open_template_folders, PlatformCommand};
pub use registry::{default_registry, MemoryRegistry, NullRegistry, RegistryStore};

#[cfg(windows)]
pub use registry::WindowsRegistry;
