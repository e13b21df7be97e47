//! Canonical key ordering derived from the reference locale.

use std::collections::HashMap;

use crate::input::properties::PropertySource;
use crate::types::KeyOrdinal;

/// Dense `0..N` ordinals for the reference locale's keys.
///
/// Keys that only appear in other locales never get an ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIndex {
    /// Keys in ordinal order
    keys: Vec<String>,
    /// Key → ordinal
    ordinals: HashMap<String, KeyOrdinal>,
}

impl KeyIndex {
    /// Builds the index from `(key, first-seen position)` pairs.
    ///
    /// Pairs are ordered by position; a repeated key keeps its first ordinal.
    pub fn from_positions<'a>(pairs: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let mut pairs: Vec<_> = pairs.into_iter().collect();
        pairs.sort_by_key(|&(_, position)| position);

        let mut index = Self::default();
        for (key, _) in pairs {
            if index.ordinals.contains_key(key) {
                continue;
            }
            index.ordinals.insert(key.to_string(), KeyOrdinal::new(index.keys.len()));
            index.keys.push(key.to_string());
        }
        index
    }

    /// Indexes the keys of the reference locale.
    #[must_use]
    pub fn from_reference(reference: &PropertySource) -> Self {
        let index = Self::from_positions(reference.keys());
        tracing::debug!(locale = reference.locale(), keys = index.len(), "Indexed reference keys");
        index
    }

    /// Ordinal of `key`, if the reference locale defines it.
    #[must_use]
    pub fn ordinal(&self, key: &str) -> Option<KeyOrdinal> {
        self.ordinals.get(key).copied()
    }

    /// Key at `ordinal`.
    #[must_use]
    pub fn key(&self, ordinal: KeyOrdinal) -> Option<&str> {
        self.keys.get(ordinal.get()).map(String::as_str)
    }

    /// Keys in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyOrdinal, &str)> {
        self.keys.iter().enumerate().map(|(i, key)| (KeyOrdinal::new(i), key.as_str()))
    }

    /// Number of indexed keys.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.keys.len()
    }

    /// `true` when the reference locale has no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
