#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for officetpl
//!
//! This crate provides the template model, destination roles and the
//! classifier that routes files to them, author check results, install
//! tallies and the recent-templates list codec.

pub mod author;
pub mod destination;
pub mod install;
pub mod mru;
pub mod reports;
pub mod template;

// Re-export commonly used types
pub use author::{
    default_allowed_authors, normalize_authors, parse_author_list, AuthorCheckResult,
    AuthorFinding, DEFAULT_ALLOWED_AUTHORS,
};
pub use destination::{DestinationRole, DestinationSet, ResolvedPaths};
pub use install::{InstallCounters, InstallFlags};
pub use mru::{MruEntry, MruList, MruValueName, MRU_CAPACITY, MRU_VALUE_PREFIX, OFFICE_VERSIONS};
pub use reports::{InstallReport, UninstallReport};
pub use template::{
    base_template, is_base_template_name, normalize_path, BaseTemplate, OfficeApp,
    TemplateExtension, TemplateFile, TemplateRole, BASE_TEMPLATES, NORMAL_TEMPLATE_NAMES,
};

use serde::{Deserialize, Serialize};

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
