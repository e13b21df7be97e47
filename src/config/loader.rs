//! Settings file loading

use std::path::Path;

use super::{
    CompilerSettings,
    ConfigError,
};

/// Name of the optional settings file looked up in the working root.
pub const SETTINGS_FILE_NAME: &str = ".lang-strtab.json";

/// Reads settings from the working root.
///
/// # Returns
/// - `Ok(Some(settings))`: settings file found and parsed
/// - `Ok(None)`: no settings file
/// - `Err(ConfigError)`: read or parse failure
pub(super) fn load_from_root(root: &Path) -> Result<Option<CompilerSettings>, ConfigError> {
    let config_path = root.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: CompilerSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// Loads the settings for a run and validates them.
///
/// Falls back to [`CompilerSettings::default`] when the root has no settings file.
///
/// # Errors
/// - File read error
/// - JSON parse error
/// - Validation error
pub fn load_settings(root: &Path) -> Result<CompilerSettings, ConfigError> {
    let settings = load_from_root(root)?.unwrap_or_default();
    settings.validate().map_err(ConfigError::ValidationErrors)?;
    tracing::debug!("Settings loaded: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_root`: settings file present
    #[rstest]
    fn test_load_from_root_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), r#"{"referenceLocale": "fr"}"#)
            .unwrap();

        let settings = load_from_root(temp_dir.path()).unwrap();

        assert_eq!(settings.unwrap().reference_locale, "fr");
    }

    /// `load_from_root`: no settings file
    #[rstest]
    fn test_load_from_root_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(result.unwrap().is_none());
    }

    /// `load_from_root`: JSON parse error
    #[rstest]
    fn test_load_from_root_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "invalid json").unwrap();

        let result = load_from_root(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// `load_settings`: defaults without a settings file
    #[rstest]
    fn test_load_settings_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();

        let settings = load_settings(temp_dir.path()).unwrap();

        assert_eq!(settings, CompilerSettings::default());
    }

    /// `load_settings`: validation runs on loaded values
    #[rstest]
    fn test_load_settings_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), r#"{"referenceLocale": ""}"#)
            .unwrap();

        let result = load_settings(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(errors)) if errors.len() == 1));
    }
}
