//! Shared helpers for unit tests.
#![cfg(test)]

use crate::indexer::KeyIndex;
use crate::input::properties::{
    LoadedLocales,
    PropertySource,
};
use crate::table::StringTable;

/// Builds an untransformed table with `en` as the reference locale.
///
/// # Arguments
/// * `sources` - `(locale, property text)` pairs
#[allow(clippy::unwrap_used)]
pub(crate) fn build_table(sources: &[(&str, &str)]) -> StringTable {
    let loaded = LoadedLocales::new(
        sources.iter().map(|&(locale, text)| PropertySource::parse(locale, text)).collect(),
        "en",
    )
    .unwrap();
    let keys = KeyIndex::from_reference(loaded.reference());
    StringTable::build(&loaded, keys, None)
}
