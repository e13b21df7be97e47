//! Core types used throughout the project.

use std::fmt;

/// Locale identifier (e.g., `"en"`, `"pt_BR"`), taken from the source file stem.
pub type LocaleId = String;

/// Position of a key in the reference locale (0-based, dense).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyOrdinal(
    /// Zero-based position
    usize,
);

impl KeyOrdinal {
    /// Wraps a raw position.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Raw position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for KeyOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emission identifier of a pooled string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolIndex(
    /// Zero-based emission number
    usize,
);

impl PoolIndex {
    /// Wraps a raw emission number.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Raw emission number.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replaces every character that cannot appear in a C identifier with `_`.
#[must_use]
pub fn c_identifier(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect()
}
