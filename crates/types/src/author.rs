//! Author check results

use serde::{Deserialize, Serialize};

/// Default allowlist applied when nothing else is configured
pub const DEFAULT_ALLOWED_AUTHORS: [&str; 2] = ["www.grada.cc", "www.gradaz.com"];

/// What a directory scan found for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthorFinding {
    /// Author read from the document properties
    Author { file: String, author: String },
    /// Readable metadata with an empty creator
    Empty { file: String },
    /// Themes are never inspected
    Skipped { file: String },
    /// Metadata could not be read
    Unreadable { file: String, reason: String },
}

impl AuthorFinding {
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Author { file, .. }
            | Self::Empty { file }
            | Self::Skipped { file }
            | Self::Unreadable { file, .. } => file,
        }
    }
}

/// Outcome of an author check on a file or directory.
///
/// `allowed` is never true while `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCheckResult {
    allowed: bool,
    message: String,
    authors: Vec<String>,
    error: bool,
    /// Per-file findings, populated in directory mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    findings: Vec<AuthorFinding>,
}

impl AuthorCheckResult {
    #[must_use]
    pub fn allowed(message: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            allowed: true,
            message: message.into(),
            authors,
            error: false,
            findings: Vec::new(),
        }
    }

    #[must_use]
    pub fn denied(message: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            allowed: false,
            message: message.into(),
            authors,
            error: false,
            findings: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            message: message.into(),
            authors: Vec::new(),
            error: true,
            findings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_findings(mut self, findings: Vec<AuthorFinding>) -> Self {
        self.findings = findings;
        self
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Whether the target could not be read at all
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Authors read from the target, in the order found
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    #[must_use]
    pub fn findings(&self) -> &[AuthorFinding] {
        &self.findings
    }

    /// `TRUE` only for an allowed result without error
    #[must_use]
    pub fn as_cli_output(&self) -> &'static str {
        if self.allowed && !self.error {
            "TRUE"
        } else {
            "FALSE"
        }
    }
}

/// Normalize an allowlist: trim entries and drop empty ones
#[must_use]
pub fn normalize_authors<I, S>(authors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    authors
        .into_iter()
        .map(|author| author.as_ref().trim().to_string())
        .filter(|author| !author.is_empty())
        .collect()
}

/// Parse a `;`-separated allowlist
#[must_use]
pub fn parse_author_list(raw: &str) -> Vec<String> {
    normalize_authors(raw.split(';'))
}

#[must_use]
pub fn default_allowed_authors() -> Vec<String> {
    DEFAULT_ALLOWED_AUTHORS.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_output_requires_allowed_without_error() {
        assert_eq!(AuthorCheckResult::allowed("ok", vec![]).as_cli_output(), "TRUE");
        assert_eq!(AuthorCheckResult::denied("no", vec![]).as_cli_output(), "FALSE");
        let failed = AuthorCheckResult::failed("broken");
        assert!(!failed.is_allowed());
        assert!(failed.is_error());
        assert_eq!(failed.message(), "broken");
        assert_eq!(failed.as_cli_output(), "FALSE");
    }

    #[test]
    fn author_list_parsing() {
        assert_eq!(
            parse_author_list(" www.grada.cc ; ;Other Corp;"),
            vec!["www.grada.cc".to_string(), "Other Corp".to_string()]
        );
        assert!(parse_author_list(" ; ").is_empty());
    }
}
