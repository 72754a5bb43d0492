//! Destination directories and the file-name classifier that routes templates to them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::template::{base_template, TemplateExtension};

/// Logical destination roles. Declaration order is iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationRole {
    Word,
    #[serde(rename = "POWERPOINT")]
    PowerPoint,
    Excel,
    Custom,
    CustomAlt,
    WordCustom,
    #[serde(rename = "POWERPOINT_CUSTOM")]
    PowerPointCustom,
    ExcelCustom,
    Roaming,
    Themes,
}

impl DestinationRole {
    pub const ALL: [DestinationRole; 10] = [
        Self::Word,
        Self::PowerPoint,
        Self::Excel,
        Self::Custom,
        Self::CustomAlt,
        Self::WordCustom,
        Self::PowerPointCustom,
        Self::ExcelCustom,
        Self::Roaming,
        Self::Themes,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "WORD",
            Self::PowerPoint => "POWERPOINT",
            Self::Excel => "EXCEL",
            Self::Custom => "CUSTOM",
            Self::CustomAlt => "CUSTOM_ALT",
            Self::WordCustom => "WORD_CUSTOM",
            Self::PowerPointCustom => "POWERPOINT_CUSTOM",
            Self::ExcelCustom => "EXCEL_CUSTOM",
            Self::Roaming => "ROAMING",
            Self::Themes => "THEMES",
        }
    }

    /// Role used for custom templates with the given extension
    #[must_use]
    pub fn for_extension(extension: TemplateExtension) -> Self {
        match extension {
            TemplateExtension::Dotx | TemplateExtension::Dotm => Self::WordCustom,
            TemplateExtension::Potx | TemplateExtension::Potm => Self::PowerPointCustom,
            TemplateExtension::Xltx | TemplateExtension::Xltm => Self::ExcelCustom,
            TemplateExtension::Thmx => Self::Themes,
        }
    }
}

impl fmt::Display for DestinationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named per-user Office directories produced by path resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPaths {
    pub appdata: PathBuf,
    pub documents: PathBuf,
    pub theme: PathBuf,
    pub custom_word: PathBuf,
    pub custom_ppt: PathBuf,
    pub custom_excel: PathBuf,
    pub custom_additional: PathBuf,
    pub roaming: PathBuf,
    pub excel_startup: PathBuf,
}

impl ResolvedPaths {
    /// Template folders with their display labels, in folder-opening order
    #[must_use]
    pub fn template_folders(&self) -> [(&'static str, &Path); 7] {
        [
            ("THEME_PATH", self.theme.as_path()),
            ("CUSTOM_WORD_TEMPLATE_PATH", self.custom_word.as_path()),
            ("CUSTOM_PPT_TEMPLATE_PATH", self.custom_ppt.as_path()),
            ("CUSTOM_EXCEL_TEMPLATE_PATH", self.custom_excel.as_path()),
            ("ROAMING_TEMPLATE_PATH", self.roaming.as_path()),
            ("EXCEL_STARTUP_PATH", self.excel_startup.as_path()),
            ("CUSTOM_ADDITIONAL_PATH", self.custom_additional.as_path()),
        ]
    }
}

/// Mapping from destination role to an absolute directory.
///
/// Built once per run and read-only afterwards. Iteration follows
/// [`DestinationRole`] declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSet {
    dirs: BTreeMap<DestinationRole, PathBuf>,
}

impl DestinationSet {
    /// Map resolved directories onto every destination role
    #[must_use]
    pub fn from_paths(paths: &ResolvedPaths) -> Self {
        let dirs = DestinationRole::ALL
            .into_iter()
            .map(|role| {
                let dir = match role {
                    DestinationRole::Word
                    | DestinationRole::PowerPoint
                    | DestinationRole::Roaming => &paths.roaming,
                    DestinationRole::Excel => &paths.excel_startup,
                    DestinationRole::Custom | DestinationRole::WordCustom => &paths.custom_word,
                    DestinationRole::PowerPointCustom => &paths.custom_ppt,
                    DestinationRole::ExcelCustom => &paths.custom_excel,
                    DestinationRole::CustomAlt => &paths.custom_additional,
                    DestinationRole::Themes => &paths.theme,
                };
                (role, dir.clone())
            })
            .collect();
        Self { dirs }
    }

    /// Build from explicit role/directory pairs; roles left out have no directory
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (DestinationRole, PathBuf)>) -> Self {
        Self {
            dirs: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, role: DestinationRole) -> Option<&Path> {
        self.dirs.get(&role).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DestinationRole, &Path)> {
        self.dirs.iter().map(|(role, dir)| (*role, dir.as_path()))
    }

    /// Every configured directory, one entry per role (duplicates kept)
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.dirs.values().map(PathBuf::as_path)
    }

    /// Roles whose directory equals `dir`
    pub fn roles_for_dir<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = DestinationRole> + 'a {
        self.dirs
            .iter()
            .filter(move |(_, candidate)| candidate.as_path() == dir)
            .map(|(role, _)| *role)
    }

    /// Classify a file name to its destination role.
    ///
    /// Base template names route by name (Word and PowerPoint to `WORD` /
    /// `POWERPOINT`, which are the roaming folder; Excel to the startup
    /// folder). Everything else routes by extension alone.
    #[must_use]
    pub fn classify(file_name: &str) -> Option<DestinationRole> {
        if let Some(base) = base_template(file_name) {
            return Some(base.destination);
        }
        TemplateExtension::from_file_name(file_name).map(DestinationRole::for_extension)
    }

    /// Resolve the destination directory for a file name
    #[must_use]
    pub fn resolve_destination(&self, file_name: &str) -> Option<(DestinationRole, &Path)> {
        let role = Self::classify(file_name)?;
        self.get(role).map(|dir| (role, dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BASE_TEMPLATES;
    use proptest::prelude::*;

    fn sample_paths() -> ResolvedPaths {
        ResolvedPaths {
            appdata: PathBuf::from("/home/u/AppData/Roaming"),
            documents: PathBuf::from("/home/u/Documents"),
            theme: PathBuf::from("/home/u/AppData/Roaming/Microsoft/Templates/Document Themes"),
            custom_word: PathBuf::from("/home/u/Documents/Custom Office Templates"),
            custom_ppt: PathBuf::from("/home/u/Documents/PowerPoint Templates"),
            custom_excel: PathBuf::from("/home/u/Documents/Excel Templates"),
            custom_additional: PathBuf::from(
                "/home/u/Documents/Plantillas personalizadas de Office",
            ),
            roaming: PathBuf::from("/home/u/AppData/Roaming/Microsoft/Templates"),
            excel_startup: PathBuf::from("/home/u/AppData/Roaming/Microsoft/Excel/XLSTART"),
        }
    }

    #[test]
    fn from_paths_maps_every_role() {
        let paths = sample_paths();
        let set = DestinationSet::from_paths(&paths);
        assert_eq!(set.iter().count(), DestinationRole::ALL.len());
        assert_eq!(set.get(DestinationRole::Word), Some(paths.roaming.as_path()));
        assert_eq!(set.get(DestinationRole::Excel), Some(paths.excel_startup.as_path()));
        assert_eq!(set.get(DestinationRole::Custom), Some(paths.custom_word.as_path()));
        assert_eq!(
            set.get(DestinationRole::CustomAlt),
            Some(paths.custom_additional.as_path())
        );
        let order: Vec<_> = set.iter().map(|(role, _)| role).collect();
        assert_eq!(order, DestinationRole::ALL.to_vec());
    }

    #[test]
    fn base_templates_route_by_name() {
        let paths = sample_paths();
        let set = DestinationSet::from_paths(&paths);
        for base in &BASE_TEMPLATES {
            let (_, dir) = set.resolve_destination(base.file_name).unwrap();
            let expected = match base.app {
                crate::OfficeApp::Excel => &paths.excel_startup,
                _ => &paths.roaming,
            };
            assert_eq!(dir, expected.as_path(), "{}", base.file_name);
        }
    }

    #[test]
    fn custom_templates_route_by_extension() {
        let set = DestinationSet::from_paths(&sample_paths());
        let cases = [
            ("Letter.dotm", DestinationRole::WordCustom),
            ("Deck.POTX", DestinationRole::PowerPointCustom),
            ("Budget.xltx", DestinationRole::ExcelCustom),
            ("Brand.thmx", DestinationRole::Themes),
            ("Normal.potx", DestinationRole::PowerPointCustom),
        ];
        for (name, role) in cases {
            assert_eq!(set.resolve_destination(name).map(|(r, _)| r), Some(role), "{name}");
        }
        assert!(set.resolve_destination("notes.docx").is_none());
    }

    #[test]
    fn missing_role_yields_no_destination() {
        let set = DestinationSet::from_entries([(
            DestinationRole::Roaming,
            PathBuf::from("/tmp/roaming"),
        )]);
        assert!(set.resolve_destination("Letter.dotx").is_none());
    }

    fn case_variants(ext: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), ext.len()).prop_map(move |upper| {
            ext.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn base_names_ignore_extension_case(
            index in 0usize..BASE_TEMPLATES.len(),
            seed in any::<u64>(),
        ) {
            let base = &BASE_TEMPLATES[index];
            let (stem, ext) = base.file_name.rsplit_once('.').unwrap();
            let cased: String = ext
                .chars()
                .enumerate()
                .map(|(i, c)| if (seed >> i) & 1 == 1 { c.to_ascii_uppercase() } else { c })
                .collect();
            let name = format!("{stem}.{cased}");
            prop_assert_eq!(DestinationSet::classify(&name), Some(base.destination));
        }

        #[test]
        fn custom_names_route_only_by_extension(
            stem in "[A-Za-z0-9 _-]{1,24}",
            ext_index in 0usize..TemplateExtension::ALL.len(),
        ) {
            let ext = TemplateExtension::ALL[ext_index];
            let name = format!("{stem}{}", ext.as_str());
            prop_assume!(!crate::is_base_template_name(&name));
            prop_assert_eq!(
                DestinationSet::classify(&name),
                Some(DestinationRole::for_extension(ext))
            );
        }

        #[test]
        fn extension_case_never_changes_custom_routing(
            ext in case_variants("xltm"),
        ) {
            let name = format!("Quarterly.{ext}");
            prop_assert_eq!(DestinationSet::classify(&name), Some(DestinationRole::ExcelCustom));
        }
    }
}
