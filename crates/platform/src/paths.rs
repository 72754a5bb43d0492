//! Per-user Office directory resolution
//!
//! Each directory follows a fallback chain over registry values, environment
//! variables and the home directory. Config overrides replace individual
//! entries after resolution.

use officetpl_config::PathConfig;
use officetpl_events::{AppEvent, EventEmitter, PathsEvent};
use officetpl_types::{normalize_path, OfficeApp, ResolvedPaths, OFFICE_VERSIONS};
use std::path::{Path, PathBuf};

use crate::registry::RegistryStore;

const SHELL_FOLDERS_KEY: &str =
    r"Software\Microsoft\Windows\CurrentVersion\Explorer\User Shell Folders";

/// Folder name used when Office has no personal templates location configured
pub const DEFAULT_CUSTOM_DIR: &str = "Custom Office Templates";

/// Localized secondary custom templates folder
pub const DEFAULT_CUSTOM_ALT_DIR: &str = "Plantillas personalizadas de Office";

fn personal_templates_key(version: &str, app: OfficeApp) -> String {
    format!(
        r"Software\Microsoft\Office\{version}\{}\Options",
        app.registry_name()
    )
}

fn user_templates_key(version: &str) -> String {
    format!(r"Software\Microsoft\Office\{version}\Common\General")
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Resolves the named template directories for the current user
pub struct PathResolver<'a> {
    registry: &'a dyn RegistryStore,
    env: EnvLookup<'a>,
    home: Option<PathBuf>,
    overrides: PathConfig,
}

impl<'a> PathResolver<'a> {
    /// Resolver over `registry` and the process environment
    #[must_use]
    pub fn new(registry: &'a dyn RegistryStore) -> Self {
        Self {
            registry,
            env: Box::new(|key: &str| std::env::var(key).ok()),
            home: dirs::home_dir(),
            overrides: PathConfig::default(),
        }
    }

    /// Replace the environment source
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Replace the home directory used as the last fallback
    #[must_use]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Apply per-directory overrides after resolution
    #[must_use]
    pub fn with_overrides(mut self, overrides: PathConfig) -> Self {
        self.overrides = overrides;
        self
    }

    fn env_var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.trim().is_empty())
    }

    fn home(&self) -> PathBuf {
        self.home.clone().unwrap_or_default()
    }

    /// Read a registry string with `%VAR%` expansion; absent, empty and unreadable all yield `None`
    fn registry_value(&self, key: &str, name: &str) -> Option<String> {
        let raw = self.registry.read_string(key, name).ok().flatten()?;
        let expanded = expand_env_vars(&raw, |var| (self.env)(var));
        if expanded.trim().is_empty() {
            None
        } else {
            Some(expanded)
        }
    }

    fn appdata(&self) -> PathBuf {
        if let Some(value) = self.registry_value(SHELL_FOLDERS_KEY, "AppData") {
            return normalize_path(&value);
        }
        if let Some(value) = self.env_var("APPDATA") {
            return normalize_path(&value);
        }
        self.home().join("AppData").join("Roaming")
    }

    fn documents(&self) -> PathBuf {
        if let Some(value) = self.registry_value(SHELL_FOLDERS_KEY, "Personal") {
            return normalize_path(&value);
        }
        if let Some(profile) = self.env_var("USERPROFILE") {
            return normalize_path(&profile).join("Documents");
        }
        self.home().join("Documents")
    }

    /// First `PersonalTemplates` for `app`, then first `UserTemplates`, across Office versions
    fn office_templates(&self, app: OfficeApp) -> Option<PathBuf> {
        OFFICE_VERSIONS
            .iter()
            .find_map(|version| {
                self.registry_value(&personal_templates_key(version, app), "PersonalTemplates")
            })
            .or_else(|| {
                OFFICE_VERSIONS.iter().find_map(|version| {
                    self.registry_value(&user_templates_key(version), "UserTemplates")
                })
            })
            .map(|value| normalize_path(&value))
    }

    /// Resolve every directory, apply overrides and report the result on the paths channel
    pub fn resolve<E: EventEmitter + ?Sized>(&self, emitter: &E) -> ResolvedPaths {
        let appdata = self.appdata();
        let documents = self.documents();
        let custom_word = self
            .office_templates(OfficeApp::Word)
            .unwrap_or_else(|| documents.join(DEFAULT_CUSTOM_DIR));
        let custom_ppt = self
            .office_templates(OfficeApp::PowerPoint)
            .unwrap_or_else(|| custom_word.clone());
        let custom_excel = self
            .office_templates(OfficeApp::Excel)
            .unwrap_or_else(|| custom_word.clone());
        let templates = appdata.join("Microsoft").join("Templates");

        let mut paths = ResolvedPaths {
            theme: templates.join("Document Themes"),
            roaming: templates,
            excel_startup: appdata.join("Microsoft").join("Excel").join("XLSTART"),
            custom_additional: documents.join(DEFAULT_CUSTOM_ALT_DIR),
            appdata,
            documents,
            custom_word,
            custom_ppt,
            custom_excel,
        };
        apply_overrides(&mut paths, &self.overrides);

        emitter.emit(AppEvent::Paths(PathsEvent::Resolved {
            entries: labelled_entries(&paths),
        }));
        emitter.emit(AppEvent::Paths(PathsEvent::RegistrySources {
            entries: self.registry_sources(),
        }));
        paths
    }

    /// Raw `PersonalTemplates` / `UserTemplates` values of the newest Office version
    #[must_use]
    pub fn registry_sources(&self) -> Vec<(String, Option<String>)> {
        let version = OFFICE_VERSIONS[0];
        let user_templates = self.registry_value(&user_templates_key(version), "UserTemplates");
        OfficeApp::ALL
            .into_iter()
            .flat_map(|app| {
                let personal = self
                    .registry_value(&personal_templates_key(version, app), "PersonalTemplates");
                [
                    (format!("{} PersonalTemplates", app.registry_name()), personal),
                    (
                        format!("{} UserTemplates", app.registry_name()),
                        user_templates.clone(),
                    ),
                ]
            })
            .collect()
    }
}

fn apply_overrides(paths: &mut ResolvedPaths, overrides: &PathConfig) {
    let slots: [(&Option<PathBuf>, &mut PathBuf); 6] = [
        (&overrides.custom_word, &mut paths.custom_word),
        (&overrides.custom_powerpoint, &mut paths.custom_ppt),
        (&overrides.custom_excel, &mut paths.custom_excel),
        (&overrides.custom_additional, &mut paths.custom_additional),
        (&overrides.roaming, &mut paths.roaming),
        (&overrides.excel_startup, &mut paths.excel_startup),
    ];
    for (value, slot) in slots {
        if let Some(path) = value {
            *slot = normalize_path(&path.to_string_lossy());
        }
    }
}

/// Every resolved directory under its display label
#[must_use]
pub fn labelled_entries(paths: &ResolvedPaths) -> Vec<(String, PathBuf)> {
    let mut entries = vec![
        ("APPDATA".to_string(), paths.appdata.clone()),
        ("DOCUMENTS".to_string(), paths.documents.clone()),
    ];
    entries.extend(
        paths
            .template_folders()
            .into_iter()
            .map(|(label, path)| (label.to_string(), path.to_path_buf())),
    );
    entries
}

/// Expand `%NAME%` references. Unknown names are left untouched.
#[must_use]
pub fn expand_env_vars<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Whether `path` lies inside `appdata`, compared case-insensitively on resolved paths
#[must_use]
pub fn path_in_appdata(path: &Path, appdata: &Path) -> bool {
    let resolve = |p: &Path| {
        std::fs::canonicalize(p)
            .unwrap_or_else(|_| p.to_path_buf())
            .to_string_lossy()
            .replace('\\', "/")
            .to_lowercase()
    };
    let appdata = resolve(appdata);
    if appdata.is_empty() {
        return false;
    }
    let path = resolve(path);
    path == appdata || path.starts_with(&format!("{}/", appdata.trim_end_matches('/')))
}
