//! One compiler run: load, index, transform, pool, emit.

use std::ffi::OsString;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::config::{
    CompilerSettings,
    ConfigError,
};
use crate::emit::{
    EmitOptions,
    render_header,
    render_source,
};
use crate::indexer::KeyIndex;
use crate::input::properties::{
    LoadError,
    load_locales,
};
use crate::input::transform_table::{
    TransformTableError,
    load_transform_table,
};
use crate::table::StringTable;
use crate::transform::CharTransformer;

/// Transform table picked up from the locale directory when none is configured.
pub const DEFAULT_TRANSFORM_TABLE: &str = "transform.tsv";

/// Any failure of a compiler run. All are fatal.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Invalid settings
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Locale sources could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Transform table could not be loaded
    #[error(transparent)]
    TransformTable(#[from] TransformTableError),

    /// An output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying write error
        #[source]
        source: std::io::Error,
    },
}

/// Rendered output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// Contents of the `.c` file
    pub source: String,
    /// Contents of the `.h` file
    pub header: String,
}

/// Transform table to use, resolved against `root`.
///
/// The configured path wins; otherwise [`DEFAULT_TRANSFORM_TABLE`] inside the
/// locale directory is used when present.
#[must_use]
pub fn transform_table_path(settings: &CompilerSettings, root: &Path) -> Option<PathBuf> {
    if let Some(path) = &settings.transform_table {
        return Some(root.join(path));
    }
    let default = root.join(&settings.lang_dir).join(DEFAULT_TRANSFORM_TABLE);
    if default.is_file() {
        tracing::debug!("Using transform table from the locale directory: {:?}", default);
        Some(default)
    } else {
        None
    }
}

/// Compiles the locale sources under `root` into a [`StringTable`].
///
/// Relative paths in `settings` are resolved against `root`.
///
/// # Errors
/// - Missing or unreadable locale source / transform table
/// - Malformed transform table
pub fn compile(settings: &CompilerSettings, root: &Path) -> Result<StringTable, CompileError> {
    let lang_dir = root.join(&settings.lang_dir);
    let loaded = load_locales(&lang_dir, &settings.file_pattern, &settings.reference_locale)?;
    let keys = KeyIndex::from_reference(loaded.reference());

    let mut transformer = match transform_table_path(settings, root) {
        Some(path) => {
            let ranges = load_transform_table(&path)?;
            Some(CharTransformer::new(ranges, settings.enforce_locale_scope))
        }
        None => None,
    };

    let table = StringTable::build(&loaded, keys, transformer.as_mut());

    if let Some(transformer) = &transformer {
        let unmapped: String = transformer.unmapped().collect();
        if !unmapped.is_empty() {
            tracing::warn!(
                count = unmapped.chars().count(),
                characters = %unmapped,
                "Some characters were replaced by a fallback"
            );
        }
    }

    tracing::info!(
        locales = table.locales().len(),
        keys = table.keys().len(),
        strings = table.pool().len(),
        "Compiled string table"
    );
    Ok(table)
}

/// Renders both output files without touching the filesystem.
#[must_use]
pub fn render(table: &StringTable, options: &EmitOptions) -> GeneratedFiles {
    GeneratedFiles { source: render_source(table, options), header: render_header(table, options) }
}

/// Compiles and writes the source/header pair.
///
/// Both files are staged next to their targets and only moved into place once
/// both are written, so a failed run leaves existing outputs untouched.
///
/// # Errors
/// - Any [`compile`] error
/// - Output write failure
pub fn run(
    settings: &CompilerSettings,
    root: &Path,
    source_path: &Path,
    header_path: &Path,
) -> Result<(), CompileError> {
    let table = compile(settings, root)?;
    let options = EmitOptions::new(header_path, settings.storage_qualifier.clone());
    let files = render(&table, &options);

    let staged_source = stage_output(source_path, &files.source)?;
    let staged_header = match stage_output(header_path, &files.header) {
        Ok(staged) => staged,
        Err(err) => {
            discard(&staged_source);
            return Err(err);
        }
    };

    commit(&staged_source, source_path)
        .and_then(|()| commit(&staged_header, header_path))
        .inspect_err(|_| {
            discard(&staged_source);
            discard(&staged_header);
        })?;

    tracing::info!(
        source = %source_path.display(),
        header = %header_path.display(),
        "Wrote string table"
    );
    Ok(())
}

/// `dir/.lang.c.tmp` for `dir/lang.c`.
fn staged_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to the staging file of `path`.
fn stage_output(path: &Path, contents: &str) -> Result<PathBuf, CompileError> {
    let staged = staged_path(path);
    std::fs::write(&staged, contents)
        .map_err(|source| CompileError::Write { path: path.to_path_buf(), source })?;
    Ok(staged)
}

/// Moves a staged file onto its target.
fn commit(staged: &Path, path: &Path) -> Result<(), CompileError> {
    std::fs::rename(staged, path)
        .map_err(|source| CompileError::Write { path: path.to_path_buf(), source })
}

/// Removes a leftover staging file.
fn discard(staged: &Path) {
    if let Err(err) = std::fs::remove_file(staged)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        tracing::debug!(?err, "Failed to remove staged output {:?}", staged);
    }
}
