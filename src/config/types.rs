use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A single invalid settings field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "filePattern")
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields failed validation
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The settings file could not be read
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The settings file is not valid JSON
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered, one-per-line listing of validation errors.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings of one compiler run.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerSettings {
    /// Directory holding one property file per locale, relative to the root.
    pub lang_dir: PathBuf,

    /// Glob matched against file names inside `lang_dir` (non-recursive).
    pub file_pattern: String,

    /// Locale whose keys and key order define the ordinal space.
    pub reference_locale: String,

    /// Tab-separated transform table, relative to the root.
    /// When unset, `<langDir>/transform.tsv` is used if it exists; otherwise
    /// values are emitted verbatim.
    pub transform_table: Option<PathBuf>,

    /// Consult each transform range's locale list.
    ///
    /// - `false`: every range applies to every locale (legacy output, default)
    /// - `true`: a range applies only to the locales it lists
    pub enforce_locale_scope: bool,

    /// Qualifier written into generated declarations (e.g. `__far`). May be empty.
    pub storage_qualifier: String,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            lang_dir: PathBuf::from("lang"),
            file_pattern: "*.properties".to_string(),
            reference_locale: "en".to_string(),
            transform_table: None,
            enforce_locale_scope: false,
            storage_qualifier: "__far".to_string(),
        }
    }
}

impl CompilerSettings {
    /// Checks every field, collecting all problems.
    ///
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Qualifier is not an identifier
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.lang_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "langDir",
                "The directory cannot be empty. Example: \"lang\"",
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"*.properties\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.file_pattern) {
            errors.push(ValidationError::new(
                "filePattern",
                format!("Invalid glob pattern '{}': {e}", self.file_pattern),
            ));
        }

        if self.reference_locale.is_empty() {
            errors.push(ValidationError::new(
                "referenceLocale",
                "The reference locale cannot be empty. Example: \"en\"",
            ));
        }

        if let Some(path) = &self.transform_table
            && path.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "transformTable",
                "The path cannot be empty. Please specify a table file, or remove this field",
            ));
        }

        if !self.storage_qualifier.is_empty() && !is_identifier(&self.storage_qualifier) {
            errors.push(ValidationError::new(
                "storageQualifier",
                format!(
                    "'{}' is not a valid identifier. Use e.g. \"__far\", or \"\" for none",
                    self.storage_qualifier
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// ASCII C identifier check.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    /// `validate`: defaults are valid
    #[rstest]
    fn validate_valid_settings() {
        let settings = CompilerSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    /// Missing fields take their defaults
    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"referenceLocale": "de", "transformTable": "font/charmap.tsv"}"#;

        let settings: CompilerSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.reference_locale, eq("de"));
        assert_that!(settings.file_pattern, eq("*.properties"));
        assert_that!(settings.transform_table, some(eq(&PathBuf::from("font/charmap.tsv"))));
        assert_that!(settings.enforce_locale_scope, eq(false));
    }

    /// `{}` deserializes to the defaults
    #[rstest]
    fn deserialize_empty_settings() {
        let settings: CompilerSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&CompilerSettings::default()));
        assert_that!(settings.storage_qualifier, eq("__far"));
        assert_that!(settings.lang_dir, eq(&PathBuf::from("lang")));
    }

    /// `validate`: broken glob in `filePattern`
    #[rstest]
    fn validate_invalid_file_pattern() {
        let settings =
            CompilerSettings { file_pattern: "*.{prop".to_string(), ..CompilerSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("filePattern")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("*.{prop"))
            ]])
        );
    }

    /// `validate`: each invalid field is reported under its JSON path
    #[rstest]
    #[case::empty_reference(
        CompilerSettings { reference_locale: String::new(), ..CompilerSettings::default() },
        "referenceLocale"
    )]
    #[case::empty_lang_dir(
        CompilerSettings { lang_dir: PathBuf::new(), ..CompilerSettings::default() },
        "langDir"
    )]
    #[case::empty_transform_path(
        CompilerSettings { transform_table: Some(PathBuf::new()), ..CompilerSettings::default() },
        "transformTable"
    )]
    #[case::bad_qualifier(
        CompilerSettings { storage_qualifier: "far ptr".to_string(), ..CompilerSettings::default() },
        "storageQualifier"
    )]
    fn validate_single_field_error(#[case] settings: CompilerSettings, #[case] field_path: &str) {
        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq(field_path))])
        );
    }

    /// `validate`: an empty qualifier means none
    #[rstest]
    fn validate_empty_qualifier_is_allowed() {
        let settings =
            CompilerSettings { storage_qualifier: String::new(), ..CompilerSettings::default() };

        assert_that!(settings.validate(), ok(anything()));
    }

    /// `ConfigError::ValidationErrors` lists every error, numbered
    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = CompilerSettings {
            reference_locale: String::new(),
            file_pattern: String::new(),
            ..CompilerSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let error_message = format!("{}", ConfigError::ValidationErrors(errors));

        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. filePattern"));
        assert_that!(error_message, contains_substring("2. referenceLocale"));
    }
}
