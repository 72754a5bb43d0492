//! Environment variable names and fixed file locations

pub const APP_DIR: &str = "officetpl";
pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_DESIGN_MODE: &str = "IsDesignModeEnabled";
pub const ENV_AUTHOR_VALIDATION: &str = "AuthorValidationEnabled";
pub const ENV_ALLOWED_AUTHORS: &str = "AllowedTemplateAuthors";
pub const ENV_THEME_DELAY: &str = "DOCUMENT_THEME_OPEN_DELAY_SECONDS";

pub const ENV_CUSTOM_WORD: &str = "CUSTOM_OFFICE_TEMPLATE_PATH";
pub const ENV_CUSTOM_POWERPOINT: &str = "POWERPOINT_TEMPLATE_PATH";
pub const ENV_CUSTOM_EXCEL: &str = "EXCEL_TEMPLATE_PATH";
pub const ENV_CUSTOM_ADDITIONAL: &str = "CUSTOM_OFFICE_ADDITIONAL_TEMPLATE_PATH";
pub const ENV_ROAMING: &str = "ROAMING_TEMPLATE_FOLDER_PATH";
pub const ENV_EXCEL_STARTUP: &str = "EXCEL_STARTUP_FOLDER_PATH";
