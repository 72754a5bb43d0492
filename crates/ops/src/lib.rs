#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for officetpl
//!
//! This crate serves as the orchestration layer between the CLI and the
//! specialized crates. Small operations are implemented here, while
//! install and uninstall delegate to `officetpl_install`.

mod context;
mod install;
mod small_ops;
mod uninstall;

pub use context::{OpsContextBuilder, OpsCtx};
pub use install::install;
pub use small_ops::{check_author, paths};
pub use uninstall::uninstall;

use officetpl_errors::{Error, OpsError};
use officetpl_types::{AuthorCheckResult, InstallReport, ResolvedPaths, UninstallReport};
use std::time::Instant;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Install run report
    InstallReport(InstallReport),
    /// Uninstall run report
    UninstallReport(UninstallReport),
    /// Author check verdict
    AuthorCheck(AuthorCheckResult),
    /// Resolved template folders
    Paths(ResolvedPaths),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::InstallReport(_) | OperationResult::Paths(_) => true,
            OperationResult::UninstallReport(report) => report.is_clean(),
            OperationResult::AuthorCheck(result) => result.is_allowed(),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_tagged_by_result_type() {
        let result = OperationResult::AuthorCheck(AuthorCheckResult::denied(
            "author not allowed",
            vec!["evil.com".to_string()],
        ));
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "AuthorCheck");
        assert_eq!(json["data"]["allowed"], false);
        assert_eq!(json["data"]["authors"][0], "evil.com");
        assert!(!result.is_success());
    }
}
