//! Deduplicated string storage.

use std::collections::HashMap;

use crate::types::PoolIndex;

/// Interns transformed values; identical content shares one [`PoolIndex`].
///
/// Indices are assigned in order of first encounter.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    /// Values in index order
    entries: Vec<String>,
    /// Value → index
    index: HashMap<String, PoolIndex>,
}

impl StringPool {
    /// Empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, adding it on first encounter.
    pub fn intern(&mut self, value: &str) -> PoolIndex {
        if let Some(&existing) = self.index.get(value) {
            return existing;
        }
        let index = PoolIndex::new(self.entries.len());
        self.entries.push(value.to_string());
        self.index.insert(value.to_string(), index);
        index
    }

    /// Value at `index`.
    #[must_use]
    pub fn get(&self, index: PoolIndex) -> Option<&str> {
        self.entries.get(index.get()).map(String::as_str)
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolIndex, &str)> {
        self.entries.iter().enumerate().map(|(i, value)| (PoolIndex::new(i), value.as_str()))
    }

    /// Number of distinct values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before anything is interned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
