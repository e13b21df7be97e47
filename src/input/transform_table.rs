//! Transform table source
//!
//! Tab-separated lines `fromHex<TAB>toHex<TAB>atHex<TAB>localeList`, where
//! `localeList` is comma-separated or `*`. Lines starting with `#` are comments.

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::types::LocaleId;

/// Highest codepoint representable in the narrow target encoding.
pub const TARGET_MAX: u32 = 0xFF;

/// Errors while reading a transform table. All are fatal.
#[derive(Error, Debug)]
pub enum TransformTableError {
    /// The table file could not be read
    #[error("Failed to read transform table {}: {source}", path.display())]
    Unreadable {
        /// Table path
        path: PathBuf,
        /// Underlying read error
        #[source]
        source: std::io::Error,
    },

    /// A line does not describe a valid range
    #[error("Malformed transform table line {line}: {message}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// What is wrong with the line
        message: String,
    },
}

/// Locales a transform range is declared for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleScope {
    /// `*`: every locale
    All,
    /// Listed locales only
    Only(Vec<LocaleId>),
}

impl LocaleScope {
    /// Parses a comma-separated list; `*` or an empty list means every locale.
    fn parse(field: &str) -> Self {
        let locales: Vec<LocaleId> = field
            .split(',')
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
            .map(ToString::to_string)
            .collect();
        if locales.is_empty() || locales.iter().any(|locale| locale == "*") {
            Self::All
        } else {
            Self::Only(locales)
        }
    }

    /// `true` when `locale` is in scope.
    #[must_use]
    pub fn includes(&self, locale: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(locales) => locales.iter().any(|l| l == locale),
        }
    }
}

/// Maps codepoints `from..=to` onto `at..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRange {
    /// First source codepoint
    pub from: u32,
    /// Last source codepoint (inclusive)
    pub to: u32,
    /// Target of `from`
    pub at: u32,
    /// Locales the range is declared for
    pub locales: LocaleScope,
}

impl TransformRange {
    /// `true` for `from <= codepoint <= to`.
    #[must_use]
    pub const fn contains(&self, codepoint: u32) -> bool {
        self.from <= codepoint && codepoint <= self.to
    }

    /// Target codepoint for `codepoint`, if inside the range.
    #[must_use]
    pub const fn map(&self, codepoint: u32) -> Option<u32> {
        if self.contains(codepoint) { Some(codepoint - self.from + self.at) } else { None }
    }
}

/// Parses a hex column, with or without a `0x` prefix.
fn parse_hex(field: Option<&str>, name: &str, line: usize) -> Result<u32, TransformTableError> {
    let field = field.map(str::trim).filter(|f| !f.is_empty()).ok_or_else(|| {
        TransformTableError::Malformed { line, message: format!("missing '{name}' column") }
    })?;
    let digits = field.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| TransformTableError::Malformed {
        line,
        message: format!("invalid hex '{field}' in '{name}' column: {e}"),
    })
}

/// Parses transform table text, keeping table order.
///
/// # Errors
/// Returns [`TransformTableError::Malformed`] for a line with missing or
/// invalid hex columns, an inverted range, or a target past [`TARGET_MAX`].
pub fn parse_transform_table(text: &str) -> Result<Vec<TransformRange>, TransformTableError> {
    let mut ranges = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let from = parse_hex(fields.next(), "from", line_no)?;
        let to = parse_hex(fields.next(), "to", line_no)?;
        let at = parse_hex(fields.next(), "at", line_no)?;
        let locales = LocaleScope::parse(fields.next().unwrap_or("*"));

        if to < from {
            return Err(TransformTableError::Malformed {
                line: line_no,
                message: format!("range end {to:#x} is before start {from:#x}"),
            });
        }
        if at.checked_add(to - from).is_none_or(|last| last > TARGET_MAX) {
            return Err(TransformTableError::Malformed {
                line: line_no,
                message: format!(
                    "range {from:#x}..={to:#x} at {at:#x} does not fit the target encoding"
                ),
            });
        }

        ranges.push(TransformRange { from, to, at, locales });
    }

    tracing::debug!(ranges = ranges.len(), "Parsed transform table");
    Ok(ranges)
}

/// Reads and parses a transform table file.
///
/// # Errors
/// - File read error
/// - Malformed line
pub fn load_transform_table(path: &Path) -> Result<Vec<TransformRange>, TransformTableError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| TransformTableError::Unreadable { path: path.to_path_buf(), source })?;
    parse_transform_table(&text)
}
