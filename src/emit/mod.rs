//! C header/source rendering of a [`StringTable`](crate::table::StringTable).
//!
//! Rendering is pure: both files are produced in memory and written by the caller.

/// Key defines and array declarations
mod header;
/// Pool constants and per-locale arrays
mod source;

use std::collections::HashSet;
use std::path::Path;

pub use header::render_header;
pub use source::render_source;

/// First line of every generated file.
pub const GENERATED_BANNER: &str = "// Auto-generated file. Please do not edit directly.";

/// File naming and declaration settings of the generated pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Header file name, used for the `#include` and the include guard.
    pub header_name: String,

    /// Qualifier placed on every declaration (e.g. `__far`). Empty for none.
    pub storage_qualifier: String,
}

impl EmitOptions {
    /// Options for the header at `header_path`.
    #[must_use]
    pub fn new(header_path: &Path, storage_qualifier: impl Into<String>) -> Self {
        let header_name = header_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { header_name, storage_qualifier: storage_qualifier.into() }
    }

    /// `" __far"`, or `""` without a qualifier.
    fn qualifier(&self) -> String {
        if self.storage_qualifier.is_empty() {
            String::new()
        } else {
            format!(" {}", self.storage_qualifier)
        }
    }

    /// Type of the per-locale arrays, e.g. `const char __far* const __far`.
    fn array_type(&self) -> String {
        let q = self.qualifier();
        format!("const char{q}* const{q}")
    }
}

/// `__LANG_H__` for `lang.h`.
#[must_use]
pub fn include_guard(header_name: &str) -> String {
    format!("__{}__", crate::types::c_identifier(header_name).to_uppercase())
}

/// `lang_keys_pt_BR` for `pt-BR`.
fn array_name(locale: &str) -> String {
    format!("lang_keys_{}", crate::types::c_identifier(locale))
}

/// Name of the pool constant at `index`.
fn entry_name(index: crate::types::PoolIndex) -> String {
    format!("lk_entry_{index}")
}

/// Key text safe inside a `//` comment: no line splicing, no trigraphs.
fn comment_text(key: &str) -> String {
    key.replace(['\\', '?'], "_")
}

/// Names whose C identifier repeats an earlier name's, with that identifier.
fn identifier_collisions<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, String)> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let identifier = crate::types::c_identifier(name);
            if seen.insert(identifier.clone()) { None } else { Some((name, identifier)) }
        })
        .collect()
}

/// Lines joined with a trailing newline.
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
