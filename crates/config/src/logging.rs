//! Named log channels and their per-run selection

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Diagnostic categories that can be switched on individually in design mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogChannel {
    Paths,
    Mru,
    Opening,
    Author,
    CopyBase,
    CopyCustom,
    Backup,
    AppLaunch,
    CloseApps,
    Installer,
    Uninstaller,
    General,
}

impl LogChannel {
    pub const ALL: [LogChannel; 12] = [
        Self::Paths,
        Self::Mru,
        Self::Opening,
        Self::Author,
        Self::CopyBase,
        Self::CopyCustom,
        Self::Backup,
        Self::AppLaunch,
        Self::CloseApps,
        Self::Installer,
        Self::Uninstaller,
        Self::General,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Mru => "mru",
            Self::Opening => "opening",
            Self::Author => "author",
            Self::CopyBase => "copy_base",
            Self::CopyCustom => "copy_custom",
            Self::Backup => "backup",
            Self::AppLaunch => "app_launch",
            Self::CloseApps => "close_apps",
            Self::Installer => "installer",
            Self::Uninstaller => "uninstaller",
            Self::General => "general",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == name)
    }

    /// Environment toggle for this channel, if it has one
    #[must_use]
    pub fn env_var(self) -> Option<&'static str> {
        let var = match self {
            Self::Paths => "DesignLogPaths",
            Self::Mru => "DesignLogMRU",
            Self::Opening => "DesignLogOpening",
            Self::Author => "DesignLogAuthor",
            Self::CopyBase => "DesignLogCopyBase",
            Self::CopyCustom => "DesignLogCopyCustom",
            Self::Backup => "DesignLogBackup",
            Self::AppLaunch => "DesignLogAppLaunch",
            Self::CloseApps => "DesignLogCloseApps",
            Self::Installer => "DesignLogInstaller",
            Self::Uninstaller => "DesignLogUninstaller",
            Self::General => return None,
        };
        Some(var)
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Channels enabled in design mode; empty means all of them
    pub channels: Vec<LogChannel>,
    /// Per-channel switches that win over `channels`
    pub overrides: BTreeMap<LogChannel, bool>,
}

impl LoggingConfig {
    /// Resolve the effective channel set for a run
    #[must_use]
    pub fn resolve(&self, design_mode: bool) -> LogChannels {
        let enabled = LogChannel::ALL
            .into_iter()
            .filter(|channel| {
                if let Some(&forced) = self.overrides.get(channel) {
                    return forced;
                }
                if self.channels.is_empty() {
                    design_mode
                } else {
                    self.channels.contains(channel)
                }
            })
            .collect();
        LogChannels {
            design_mode,
            enabled,
        }
    }
}

/// Effective channel selection.
///
/// Outside design mode no channel is verbose; only warnings and errors on
/// the `general` channel get through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogChannels {
    pub design_mode: bool,
    enabled: BTreeSet<LogChannel>,
}

impl LogChannels {
    /// Everything on, used by `--debug`
    #[must_use]
    pub fn all() -> Self {
        Self {
            design_mode: true,
            enabled: LogChannel::ALL.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, channel: LogChannel) -> bool {
        self.design_mode && self.enabled.contains(&channel)
    }

    /// Whether an event on `channel` should be shown
    #[must_use]
    pub fn allows(&self, channel: LogChannel, is_warning_or_error: bool) -> bool {
        if channel == LogChannel::General && is_warning_or_error {
            return true;
        }
        self.is_enabled(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_mode_off_silences_every_channel() {
        let channels = LoggingConfig::default().resolve(false);
        assert!(LogChannel::ALL.iter().all(|c| !channels.is_enabled(*c)));
        assert!(channels.allows(LogChannel::General, true));
        assert!(!channels.allows(LogChannel::General, false));
        assert!(!channels.allows(LogChannel::Mru, true));
    }

    #[test]
    fn overrides_win_over_channel_list() {
        let config = LoggingConfig {
            channels: vec![LogChannel::Mru, LogChannel::Author],
            overrides: BTreeMap::from([(LogChannel::Author, false), (LogChannel::Backup, true)]),
        };
        let channels = config.resolve(true);
        assert!(channels.is_enabled(LogChannel::Mru));
        assert!(!channels.is_enabled(LogChannel::Author));
        assert!(channels.is_enabled(LogChannel::Backup));
        assert!(!channels.is_enabled(LogChannel::Paths));
    }

    #[test]
    fn channel_names_round_trip() {
        for channel in LogChannel::ALL {
            assert_eq!(LogChannel::from_name(channel.as_str()), Some(channel));
        }
        assert_eq!(LogChannel::General.env_var(), None);
        assert_eq!(LogChannel::Mru.env_var(), Some("DesignLogMRU"));
    }
}
