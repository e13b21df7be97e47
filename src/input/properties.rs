//! Locale property source loading
//!
//! One `key=value` file per locale; the locale identifier is the file stem.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use globset::Glob;
use ignore::WalkBuilder;
use thiserror::Error;

use crate::types::LocaleId;

/// Errors while discovering or reading locale sources. All are fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The locale directory does not exist
    #[error("Locale directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// The file name glob does not compile
    #[error("Invalid locale file pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Glob compiler message
        message: String,
    },

    /// An entry of the locale directory could not be inspected
    #[error("Failed to scan locale directory {}: {source}", dir.display())]
    Walk {
        /// Directory being scanned
        dir: PathBuf,
        /// Walker error, naming the entry when known
        #[source]
        source: ignore::Error,
    },

    /// A locale source could not be read as text
    #[error("Failed to read locale source {}: {source}", path.display())]
    Unreadable {
        /// Locale source path
        path: PathBuf,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// No source file carries the reference locale
    #[error("Reference locale '{0}' has no source file")]
    MissingReferenceLocale(LocaleId),
}

/// Key/value entries of a single locale, ordered on first sight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySource {
    /// Locale the entries belong to
    locale: LocaleId,
    /// `(key, value)` in first-seen key order
    entries: Vec<(String, String)>,
    /// Key → index into `entries`
    positions: HashMap<String, usize>,
}

impl PropertySource {
    /// Parses property text.
    ///
    /// Comment lines (`#`) and lines without `=` are skipped. A key seen twice
    /// keeps its first position and takes the later value.
    #[must_use]
    pub fn parse(locale: impl Into<LocaleId>, text: &str) -> Self {
        let mut source = Self { locale: locale.into(), ..Self::default() };

        for (line_no, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                if !line.is_empty() {
                    tracing::debug!(
                        locale = %source.locale,
                        line = line_no + 1,
                        "Ignoring line without '='"
                    );
                }
                continue;
            };
            source.insert(key, value);
        }

        source
    }

    /// Adds an entry; a repeated key only replaces the value.
    fn insert(&mut self, key: &str, value: &str) {
        if let Some(&position) = self.positions.get(key) {
            tracing::debug!(locale = %self.locale, key, "Duplicate key, keeping the last value");
            if let Some(entry) = self.entries.get_mut(position) {
                entry.1 = value.to_string();
            }
            return;
        }
        self.positions.insert(key.to_string(), self.entries.len());
        self.entries.push((key.to_string(), value.to_string()));
    }

    /// Locale identifier.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Raw value of `key`, if this locale defines it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let position = *self.positions.get(key)?;
        self.entries.get(position).map(|(_, value)| value.as_str())
    }

    /// Keys with their first-seen position.
    pub fn keys(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().enumerate().map(|(position, (key, _))| (key.as_str(), position))
    }

    /// Number of distinct keys.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for a source without keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every discovered locale, sorted by identifier.
#[derive(Debug, Clone)]
pub struct LoadedLocales {
    /// Sources sorted by locale identifier
    locales: Vec<PropertySource>,
    /// Index of the reference locale in `locales`
    reference: usize,
}

impl LoadedLocales {
    /// Groups already-parsed sources.
    ///
    /// # Errors
    /// Returns [`LoadError::MissingReferenceLocale`] if no source carries `reference`.
    pub fn new(mut locales: Vec<PropertySource>, reference: &str) -> Result<Self, LoadError> {
        locales.sort_by(|a, b| a.locale.cmp(&b.locale));
        let reference = locales
            .iter()
            .position(|source| source.locale == reference)
            .ok_or_else(|| LoadError::MissingReferenceLocale(reference.to_string()))?;
        Ok(Self { locales, reference })
    }

    /// All sources, sorted by locale identifier.
    #[must_use]
    pub fn locales(&self) -> &[PropertySource] {
        &self.locales
    }

    /// Locale identifiers in sorted order.
    pub fn locale_ids(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(PropertySource::locale)
    }

    /// Source of `locale`, if discovered.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&PropertySource> {
        self.locales.iter().find(|source| source.locale == locale)
    }

    /// Source of the reference locale.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // position checked in `new`
    pub fn reference(&self) -> &PropertySource {
        &self.locales[self.reference]
    }
}

/// Finds locale source files directly inside `lang_dir`, sorted by path.
///
/// Directories are skipped; any other matching entry is returned, so a
/// broken link surfaces as an unreadable source.
///
/// # Errors
/// - Missing directory
/// - Invalid file pattern
/// - Directory entry that cannot be inspected
pub fn discover_locale_files(lang_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    if !lang_dir.is_dir() {
        return Err(LoadError::MissingDirectory(lang_dir.to_path_buf()));
    }

    let matcher = Glob::new(pattern)
        .map_err(|e| LoadError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(lang_dir)
        .max_depth(Some(1))
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .follow_links(true)
        .build()
    {
        let entry =
            result.map_err(|source| LoadError::Walk { dir: lang_dir.to_path_buf(), source })?;

        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let Some(file_name) = entry.path().file_name() else {
            continue;
        };
        if matcher.is_match(file_name) {
            found_files.push(entry.path().to_path_buf());
        }
    }

    found_files.sort();
    Ok(found_files)
}

/// Reads one locale source; the locale identifier is the file stem.
///
/// # Errors
/// Returns [`LoadError::Unreadable`] when the file cannot be read as text.
pub fn load_locale_file(path: &Path) -> Result<PropertySource, LoadError> {
    let locale = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let text = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Unreadable { path: path.to_path_buf(), source })?;

    let source = PropertySource::parse(locale, &text);
    tracing::debug!(locale = %source.locale, path = %path.display(), keys = source.len(), "Loaded locale");
    Ok(source)
}

/// Loads every locale source in `lang_dir`.
///
/// # Errors
/// - Missing directory or unreadable source
/// - No source for the reference locale
pub fn load_locales(
    lang_dir: &Path,
    pattern: &str,
    reference: &str,
) -> Result<LoadedLocales, LoadError> {
    let sources = discover_locale_files(lang_dir, pattern)?
        .iter()
        .map(|path| load_locale_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    LoadedLocales::new(sources, reference)
}
