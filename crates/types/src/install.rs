//! Install run tallies and follow-up flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DestinationRole, OfficeApp};

/// Tally for one install run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCounters {
    pub files: usize,
    pub errors: usize,
    pub blocked: usize,
}

impl InstallCounters {
    pub fn record_copied(&mut self) {
        self.files += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn record_blocked(&mut self) {
        self.blocked += 1;
    }
}

/// Applications and folders to open once a run completes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct InstallFlags {
    pub open_word: bool,
    pub open_ppt: bool,
    pub open_excel: bool,
    pub open_theme_folder: bool,
    pub open_custom_word_folder: bool,
    pub open_custom_ppt_folder: bool,
    pub open_custom_excel_folder: bool,
    pub open_roaming_folder: bool,
    pub open_excel_startup_folder: bool,
    pub open_document_theme: bool,
    pub document_theme_selection: Option<PathBuf>,
    pub custom_selection: Option<PathBuf>,
    pub roaming_selection: Option<PathBuf>,
    pub excel_startup_selection: Option<PathBuf>,
}

impl InstallFlags {
    /// Flag the folder backing `role` for opening
    pub fn mark_folder(&mut self, role: DestinationRole) {
        match role {
            DestinationRole::Themes => self.open_theme_folder = true,
            DestinationRole::Custom | DestinationRole::WordCustom => {
                self.open_custom_word_folder = true;
            }
            DestinationRole::PowerPointCustom => self.open_custom_ppt_folder = true,
            DestinationRole::ExcelCustom | DestinationRole::CustomAlt => {
                self.open_custom_excel_folder = true;
            }
            DestinationRole::Word | DestinationRole::PowerPoint | DestinationRole::Roaming => {
                self.open_roaming_folder = true;
            }
            DestinationRole::Excel => self.open_excel_startup_folder = true,
        }
    }

    /// Flag `app` for launch
    pub fn mark_app(&mut self, app: OfficeApp) {
        match app {
            OfficeApp::Word => self.open_word = true,
            OfficeApp::PowerPoint => self.open_ppt = true,
            OfficeApp::Excel => self.open_excel = true,
        }
    }

    /// Flag the folder and remember the file written there, so the folder
    /// opens with it selected
    pub fn record_copy(&mut self, role: DestinationRole, destination: &Path) {
        self.mark_folder(role);
        let selection = Some(destination.to_path_buf());
        match role {
            DestinationRole::Themes => {
                self.open_document_theme = true;
                self.document_theme_selection = selection;
            }
            DestinationRole::Word | DestinationRole::PowerPoint | DestinationRole::Roaming => {
                self.roaming_selection = selection;
            }
            DestinationRole::Excel => self.excel_startup_selection = selection,
            DestinationRole::Custom
            | DestinationRole::CustomAlt
            | DestinationRole::WordCustom
            | DestinationRole::PowerPointCustom
            | DestinationRole::ExcelCustom => self.custom_selection = selection,
        }
    }

    /// Whether the folder with the given display label should be opened
    #[must_use]
    pub fn wants_folder(&self, label: &str) -> bool {
        match label {
            "THEME_PATH" => self.open_theme_folder,
            "CUSTOM_WORD_TEMPLATE_PATH" => self.open_custom_word_folder,
            "CUSTOM_PPT_TEMPLATE_PATH" => self.open_custom_ppt_folder,
            "CUSTOM_EXCEL_TEMPLATE_PATH" | "CUSTOM_ADDITIONAL_PATH" => {
                self.open_custom_excel_folder
            }
            "ROAMING_TEMPLATE_PATH" => self.open_roaming_folder,
            "EXCEL_STARTUP_PATH" => self.open_excel_startup_folder,
            _ => false,
        }
    }

    /// Applications flagged for launch, in launch order
    #[must_use]
    pub fn apps_to_launch(&self) -> Vec<OfficeApp> {
        let mut apps = Vec::new();
        if self.open_word {
            apps.push(OfficeApp::Word);
        }
        if self.open_ppt {
            apps.push(OfficeApp::PowerPoint);
        }
        if self.open_excel {
            apps.push(OfficeApp::Excel);
        }
        apps
    }
}
