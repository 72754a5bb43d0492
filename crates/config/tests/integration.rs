//! Integration tests for config

#[cfg(test)]
mod tests {
    use officetpl_config::*;
    use officetpl_types::{ColorChoice, DEFAULT_ALLOWED_AUTHORS};
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
design_mode = true
document_theme_delay_secs = 5
launch_apps = false
color = "never"

[authors]
allowed = ["Studio One", "www.grada.cc"]
validation_enabled = false

[logging]
channels = ["mru", "copy_custom"]

[logging.overrides]
backup = true

[paths]
roaming = "/srv/templates"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(config.general.design_mode);
        assert_eq!(config.general.document_theme_delay_secs, 5);
        assert!(!config.general.launch_apps);
        assert!(config.general.open_folders);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert!(!config.authors.validation_enabled);
        assert_eq!(config.allowed_authors(), vec!["Studio One", "www.grada.cc"]);
        assert_eq!(config.paths.roaming, Some(PathBuf::from("/srv/templates")));

        let channels = config.log_channels();
        assert!(channels.is_enabled(LogChannel::Mru));
        assert!(channels.is_enabled(LogChannel::CopyCustom));
        assert!(channels.is_enabled(LogChannel::Backup));
        assert!(!channels.is_enabled(LogChannel::Paths));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/officetpl.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[general\ndesign_mode = ").unwrap();
        assert!(Config::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.general.design_mode);
        assert!(config.authors.validation_enabled);
        assert_eq!(config.allowed_authors(), DEFAULT_ALLOWED_AUTHORS.to_vec());
        assert!(config.paths.custom_word.is_none());
    }

    #[test]
    fn test_env_parsing_rules() {
        let mut config = Config::default();
        config
            .merge_env_from(lookup(&[
                ("IsDesignModeEnabled", "TRUE"),
                ("AuthorValidationEnabled", "no"),
                ("AllowedTemplateAuthors", " a.example ; ; b.example "),
                ("DOCUMENT_THEME_OPEN_DELAY_SECONDS", "3"),
                ("CUSTOM_OFFICE_TEMPLATE_PATH", " C:\\Templates\\ "),
                ("DesignLogMRU", "false"),
                ("DesignLogPaths", "True"),
            ]))
            .unwrap();

        assert!(config.general.design_mode);
        // only a literal "false" disables validation
        assert!(config.authors.validation_enabled);
        assert_eq!(config.allowed_authors(), vec!["a.example", "b.example"]);
        assert_eq!(config.general.document_theme_delay_secs, 3);
        assert_eq!(config.paths.custom_word, Some(PathBuf::from("C:\\Templates")));

        let channels = config.log_channels();
        assert!(!channels.is_enabled(LogChannel::Mru));
        assert!(channels.is_enabled(LogChannel::Paths));
        assert!(channels.is_enabled(LogChannel::Author));
    }

    #[test]
    fn test_empty_allowlist_falls_back_to_default() {
        let mut config = Config::default();
        config
            .merge_env_from(lookup(&[
                ("AllowedTemplateAuthors", " ; "),
                ("AuthorValidationEnabled", "FALSE"),
            ]))
            .unwrap();
        assert_eq!(config.allowed_authors(), DEFAULT_ALLOWED_AUTHORS.to_vec());
        assert!(!config.authors.validation_enabled);

        config.authors.allowed = vec!["  ".to_string()];
        assert_eq!(config.allowed_authors(), DEFAULT_ALLOWED_AUTHORS.to_vec());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        // Clean up any existing env vars first
        std::env::remove_var("IsDesignModeEnabled");
        std::env::remove_var("EXCEL_STARTUP_FOLDER_PATH");

        std::env::set_var("IsDesignModeEnabled", "true");
        std::env::set_var("EXCEL_STARTUP_FOLDER_PATH", "/srv/xlstart/");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert!(config.general.design_mode);
        assert_eq!(config.paths.excel_startup, Some(PathBuf::from("/srv/xlstart")));

        // Clean up
        std::env::remove_var("IsDesignModeEnabled");
        std::env::remove_var("EXCEL_STARTUP_FOLDER_PATH");
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("DOCUMENT_THEME_OPEN_DELAY_SECONDS");
        std::env::set_var("DOCUMENT_THEME_OPEN_DELAY_SECONDS", "soon");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        // Clean up
        std::env::remove_var("DOCUMENT_THEME_OPEN_DELAY_SECONDS");
    }
}
