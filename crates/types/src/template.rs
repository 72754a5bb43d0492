//! Template file model: extensions, owning applications and base names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::destination::DestinationRole;

/// Office application family owning a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeApp {
    Word,
    PowerPoint,
    Excel,
}

impl OfficeApp {
    pub const ALL: [OfficeApp; 3] = [Self::Word, Self::PowerPoint, Self::Excel];

    /// Subkey name used under `Software\Microsoft\Office\<version>`
    #[must_use]
    pub fn registry_name(self) -> &'static str {
        match self {
            Self::Word => "Word",
            Self::PowerPoint => "PowerPoint",
            Self::Excel => "Excel",
        }
    }

    /// Executable launched after an install run
    #[must_use]
    pub fn executable(self) -> &'static str {
        match self {
            Self::Word => "winword.exe",
            Self::PowerPoint => "powerpnt.exe",
            Self::Excel => "excel.exe",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Word => "Microsoft Word",
            Self::PowerPoint => "Microsoft PowerPoint",
            Self::Excel => "Microsoft Excel",
        }
    }
}

impl fmt::Display for OfficeApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Word => "WORD",
            Self::PowerPoint => "POWERPOINT",
            Self::Excel => "EXCEL",
        };
        f.write_str(label)
    }
}

/// Supported template extensions, in payload enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateExtension {
    Dotx,
    Dotm,
    Potx,
    Potm,
    Xltx,
    Xltm,
    Thmx,
}

impl TemplateExtension {
    pub const ALL: [TemplateExtension; 7] = [
        Self::Dotx,
        Self::Dotm,
        Self::Potx,
        Self::Potm,
        Self::Xltx,
        Self::Xltm,
        Self::Thmx,
    ];

    /// Parse an extension with or without the leading dot, ignoring case
    #[must_use]
    pub fn parse(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str()[1..].eq_ignore_ascii_case(ext))
    }

    /// Extension of a file name, if it is a supported template
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    /// Lowercase extension including the leading dot
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dotx => ".dotx",
            Self::Dotm => ".dotm",
            Self::Potx => ".potx",
            Self::Potm => ".potm",
            Self::Xltx => ".xltx",
            Self::Xltm => ".xltm",
            Self::Thmx => ".thmx",
        }
    }

    /// Application that opens templates of this kind; themes have none
    #[must_use]
    pub fn app(self) -> Option<OfficeApp> {
        match self {
            Self::Dotx | Self::Dotm => Some(OfficeApp::Word),
            Self::Potx | Self::Potm => Some(OfficeApp::PowerPoint),
            Self::Xltx | Self::Xltm => Some(OfficeApp::Excel),
            Self::Thmx => None,
        }
    }

    #[must_use]
    pub fn is_theme(self) -> bool {
        matches!(self, Self::Thmx)
    }
}

impl fmt::Display for TemplateExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the ten canonical Office default templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseTemplate {
    pub app: OfficeApp,
    pub file_name: &'static str,
    pub destination: DestinationRole,
}

const fn base(app: OfficeApp, file_name: &'static str, destination: DestinationRole) -> BaseTemplate {
    BaseTemplate {
        app,
        file_name,
        destination,
    }
}

/// Base templates in install order
pub const BASE_TEMPLATES: [BaseTemplate; 10] = [
    base(OfficeApp::Word, "Normal.dotx", DestinationRole::Word),
    base(OfficeApp::Word, "Normal.dotm", DestinationRole::Word),
    base(OfficeApp::Word, "NormalEmail.dotx", DestinationRole::Word),
    base(OfficeApp::Word, "NormalEmail.dotm", DestinationRole::Word),
    base(OfficeApp::PowerPoint, "Blank.potx", DestinationRole::PowerPoint),
    base(OfficeApp::PowerPoint, "Blank.potm", DestinationRole::PowerPoint),
    base(OfficeApp::Excel, "Book.xltx", DestinationRole::Excel),
    base(OfficeApp::Excel, "Book.xltm", DestinationRole::Excel),
    base(OfficeApp::Excel, "Sheet.xltx", DestinationRole::Excel),
    base(OfficeApp::Excel, "Sheet.xltm", DestinationRole::Excel),
];

/// Word templates Office regenerates on its own; removed without backup
pub const NORMAL_TEMPLATE_NAMES: [&str; 4] = [
    "Normal.dotx",
    "Normal.dotm",
    "NormalEmail.dotx",
    "NormalEmail.dotm",
];

/// Look up a base template by name.
///
/// The stem must match exactly; the extension is compared without regard
/// to case, so `Normal.DOTX` is still the Word base template.
#[must_use]
pub fn base_template(file_name: &str) -> Option<&'static BaseTemplate> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    BASE_TEMPLATES.iter().find(|candidate| {
        candidate
            .file_name
            .rsplit_once('.')
            .is_some_and(|(base_stem, base_ext)| {
                base_stem == stem && base_ext.eq_ignore_ascii_case(ext)
            })
    })
}

#[must_use]
pub fn is_base_template_name(file_name: &str) -> bool {
    base_template(file_name).is_some()
}

/// Role of a payload file, fixed by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "app", rename_all = "snake_case")]
pub enum TemplateRole {
    Base(OfficeApp),
    Custom,
}

/// A supported template found in a payload directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub file_name: String,
    pub extension: TemplateExtension,
    pub role: TemplateRole,
}

impl TemplateFile {
    /// Build from a path; `None` when the name is not a supported template
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_str()?.to_string();
        let extension = TemplateExtension::from_file_name(&file_name)?;
        let role = match base_template(&file_name) {
            Some(base) => TemplateRole::Base(base.app),
            None => TemplateRole::Custom,
        };
        Some(Self {
            path,
            file_name,
            extension,
            role,
        })
    }

    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(self.role, TemplateRole::Base(_))
    }

    #[must_use]
    pub fn is_theme(&self) -> bool {
        self.extension.is_theme()
    }
}

/// Trim surrounding whitespace and trailing separators from a path string
#[must_use]
pub fn normalize_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_end_matches(['\\', '/']))
}
