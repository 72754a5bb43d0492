#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for officetpl
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (`<config dir>/officetpl/config.toml`)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod logging;

pub use logging::{LogChannel, LogChannels, LoggingConfig};

use officetpl_errors::{ConfigError, Error};
use officetpl_types::{default_allowed_authors, normalize_authors, normalize_path, ColorChoice};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub authors: AuthorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneralConfig {
    #[serde(default)]
    pub design_mode: bool,
    #[serde(default)]
    pub document_theme_delay_secs: u64,
    #[serde(default = "default_true")]
    pub open_folders: bool,
    #[serde(default = "default_true")]
    pub launch_apps: bool,
    #[serde(default = "default_true")]
    pub close_apps: bool,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Author allowlist configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorConfig {
    #[serde(default = "default_allowed_authors")]
    pub allowed: Vec<String>,
    #[serde(default = "default_true")]
    pub validation_enabled: bool,
}

/// Per-directory overrides for path resolution
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub custom_word: Option<PathBuf>,
    pub custom_powerpoint: Option<PathBuf>,
    pub custom_excel: Option<PathBuf>,
    pub custom_additional: Option<PathBuf>,
    pub roaming: Option<PathBuf>,
    pub excel_startup: Option<PathBuf>,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            design_mode: false,
            document_theme_delay_secs: 0,
            open_folders: true,
            launch_apps: true,
            close_apps: true,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            allowed: default_allowed_authors(),
            validation_enabled: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

impl AuthorConfig {
    /// Effective allowlist: trimmed, empties dropped, default when nothing remains
    #[must_use]
    pub fn effective(&self) -> Vec<String> {
        let normalized = normalize_authors(&self.allowed);
        if normalized.is_empty() {
            default_allowed_authors()
        } else {
            normalized
        }
    }

    /// Replace the allowlist from a `;`-separated value. Empty input keeps the current list.
    pub fn replace_from_list(&mut self, raw: &str) {
        let parsed = officetpl_types::parse_author_list(raw);
        if !parsed.is_empty() {
            self.allowed = parsed;
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Directory for debug log files
    #[must_use]
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(constants::APP_DIR)
            .join("logs")
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load(),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(constants::ENV_DESIGN_MODE) {
            self.general.design_mode = value.trim().eq_ignore_ascii_case("true");
        }

        if let Some(value) = lookup(constants::ENV_AUTHOR_VALIDATION) {
            self.authors.validation_enabled = !value.trim().eq_ignore_ascii_case("false");
        }

        if let Some(value) = lookup(constants::ENV_ALLOWED_AUTHORS) {
            self.authors.replace_from_list(&value);
        }

        if let Some(value) = lookup(constants::ENV_THEME_DELAY) {
            let trimmed = value.trim();
            self.general.document_theme_delay_secs = if trimmed.is_empty() {
                0
            } else {
                trimmed.parse().map_err(|_| ConfigError::InvalidValue {
                    field: constants::ENV_THEME_DELAY.to_string(),
                    value: value.clone(),
                })?
            };
        }

        let path_vars: [(&str, &mut Option<PathBuf>); 6] = [
            (constants::ENV_CUSTOM_WORD, &mut self.paths.custom_word),
            (constants::ENV_CUSTOM_POWERPOINT, &mut self.paths.custom_powerpoint),
            (constants::ENV_CUSTOM_EXCEL, &mut self.paths.custom_excel),
            (constants::ENV_CUSTOM_ADDITIONAL, &mut self.paths.custom_additional),
            (constants::ENV_ROAMING, &mut self.paths.roaming),
            (constants::ENV_EXCEL_STARTUP, &mut self.paths.excel_startup),
        ];
        for (var, slot) in path_vars {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *slot = Some(normalize_path(&value));
            }
        }

        for channel in LogChannel::ALL {
            if let Some(var) = channel.env_var() {
                if let Some(value) = lookup(var) {
                    self.logging
                        .overrides
                        .insert(channel, value.trim().eq_ignore_ascii_case("true"));
                }
            }
        }

        Ok(())
    }

    /// Effective log channels for this run
    #[must_use]
    pub fn log_channels(&self) -> LogChannels {
        self.logging.resolve(self.general.design_mode)
    }

    /// Effective author allowlist
    #[must_use]
    pub fn allowed_authors(&self) -> Vec<String> {
        self.authors.effective()
    }
}
