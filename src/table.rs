//! Compiled string table: pooled values plus one ordinal-indexed slot array
//! per locale.

use crate::indexer::KeyIndex;
use crate::input::properties::LoadedLocales;
use crate::interned::StringPool;
use crate::transform::CharTransformer;
use crate::types::{
    KeyOrdinal,
    LocaleId,
    PoolIndex,
};

/// Slot array of one locale; slot `i` holds the value for key ordinal `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    /// Locale identifier
    locale: LocaleId,
    /// Pool entry per key ordinal
    slots: Vec<PoolIndex>,
}

impl LocaleTable {
    /// Locale identifier.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Pool entries in key ordinal order.
    #[must_use]
    pub fn slots(&self) -> &[PoolIndex] {
        &self.slots
    }

    /// Pool entry for `ordinal`.
    #[must_use]
    pub fn slot(&self, ordinal: KeyOrdinal) -> Option<PoolIndex> {
        self.slots.get(ordinal.get()).copied()
    }
}

/// Everything the emitter needs: key ordinals, the pool and the slot arrays.
#[derive(Debug, Clone)]
pub struct StringTable {
    /// Key ordinals from the reference locale
    keys: KeyIndex,
    /// Deduplicated, transformed values
    pool: StringPool,
    /// One slot array per locale, in locale order
    locales: Vec<LocaleTable>,
}

impl StringTable {
    /// Transforms and pools every value reachable through `keys`.
    ///
    /// Values are interned in ordinal order, the reference locale first and
    /// then the others in locale order. A locale without a value for a key
    /// gets the reference locale's entry. Without a transformer values are
    /// pooled verbatim.
    pub fn build(
        loaded: &LoadedLocales,
        keys: KeyIndex,
        mut transformer: Option<&mut CharTransformer>,
    ) -> Self {
        let reference = loaded.reference();
        let sources = loaded.locales();

        let mut encode = |locale: &str, raw: &str| {
            transformer.as_deref_mut().map_or_else(
                || raw.to_string(),
                |transformer| transformer.transform(locale, raw),
            )
        };

        let mut pool = StringPool::new();
        let mut slots: Vec<Vec<PoolIndex>> = vec![Vec::with_capacity(keys.len()); sources.len()];
        let mut fallbacks = 0_usize;

        for (_, key) in keys.iter() {
            let reference_raw = reference.get(key).unwrap_or_default();
            let fallback = pool.intern(&encode(reference.locale(), reference_raw));

            for (locale_slots, source) in slots.iter_mut().zip(sources) {
                let index = if source.locale() == reference.locale() {
                    fallback
                } else if let Some(raw) = source.get(key) {
                    pool.intern(&encode(source.locale(), raw))
                } else {
                    fallbacks += 1;
                    fallback
                };
                locale_slots.push(index);
            }
        }

        for source in sources {
            let unindexed = source.keys().filter(|(key, _)| keys.ordinal(key).is_none()).count();
            if unindexed > 0 {
                tracing::debug!(
                    locale = source.locale(),
                    unindexed,
                    "Keys missing from the reference locale are not emitted"
                );
            }
        }

        tracing::debug!(fallbacks, "Filled missing keys from the reference locale");

        let locales = sources
            .iter()
            .zip(slots)
            .map(|(source, slots)| LocaleTable { locale: source.locale().to_string(), slots })
            .collect();

        Self { keys, pool, locales }
    }

    /// Key ordinals.
    #[must_use]
    pub const fn keys(&self) -> &KeyIndex {
        &self.keys
    }

    /// Pooled values.
    #[must_use]
    pub const fn pool(&self) -> &StringPool {
        &self.pool
    }

    /// Slot arrays in locale order.
    #[must_use]
    pub fn locales(&self) -> &[LocaleTable] {
        &self.locales
    }

    /// Slot array of `locale`.
    #[must_use]
    pub fn locale(&self, locale: &str) -> Option<&LocaleTable> {
        self.locales.iter().find(|table| table.locale == locale)
    }

    /// Emitted text for `(locale, key)`, after fallback.
    #[must_use]
    pub fn value(&self, locale: &str, key: &str) -> Option<&str> {
        let ordinal = self.keys.ordinal(key)?;
        let index = self.locale(locale)?.slot(ordinal)?;
        self.pool.get(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::input::properties::PropertySource;
    use crate::input::transform_table::parse_transform_table;

    /// Table from in-memory sources with `en` as the reference.
    fn build(sources: &[(&str, &str)], transformer: Option<&mut CharTransformer>) -> StringTable {
        let loaded = LoadedLocales::new(
            sources.iter().map(|(locale, text)| PropertySource::parse(*locale, text)).collect(),
            "en",
        )
        .unwrap();
        let keys = KeyIndex::from_reference(loaded.reference());
        StringTable::build(&loaded, keys, transformer)
    }

    /// `build`: a missing key takes the reference value
    #[googletest::test]
    fn test_missing_key_falls_back_to_reference() {
        let table = build(&[("en", "A=1\nB=2\n"), ("de", "B=3\n")], None);

        expect_that!(table.value("de", "A"), some(eq("1")));
        expect_that!(table.value("de", "B"), some(eq("3")));
        expect_that!(table.value("en", "B"), some(eq("2")));
    }

    /// `build`: one resolvable slot per key in every locale
    #[googletest::test]
    fn test_every_locale_has_one_slot_per_key() {
        let table = build(&[("en", "A=1\nB=2\nC=3\n"), ("de", ""), ("fr", "C=x\nZ=only\n")], None);

        for locale in table.locales() {
            expect_that!(locale.slots().len(), eq(3));
            for &index in locale.slots() {
                expect_that!(table.pool().get(index), some(anything()));
            }
        }
    }

    /// `build`: equal values share a pool entry across locales
    #[googletest::test]
    fn test_identical_values_share_pool_entry() {
        let table = build(&[("en", "YES=OK\nNO=Cancel\n"), ("pl", "NO=OK\n")], None);

        let en = table.locale("en").unwrap();
        let pl = table.locale("pl").unwrap();

        expect_that!(pl.slots()[1], eq(en.slots()[0]));
        expect_that!(table.pool().len(), eq(2));
    }

    /// `build`: pool order is by ordinal, reference locale first
    #[rstest]
    fn test_pool_order_is_ordinal_then_reference_first() {
        let table = build(&[("de", "A=Eins\nB=Zwei\n"), ("en", "A=One\nB=Two\n")], None);

        let entries: Vec<_> = table.pool().iter().map(|(_, value)| value).collect();

        assert_eq!(entries, vec!["One", "Eins", "Two", "Zwei"]);
    }

    /// `build`: keys unknown to the reference are not emitted
    #[rstest]
    fn test_keys_outside_reference_are_dropped() {
        let table = build(&[("en", "A=1\n"), ("de", "A=2\nEXTRA=3\n")], None);

        assert_eq!(table.keys().len(), 1);
        assert_eq!(table.value("de", "EXTRA"), None);
        assert!(table.pool().iter().all(|(_, value)| value != "3"));
    }

    /// `build`: empty reference locale
    #[rstest]
    fn test_empty_reference_gives_empty_arrays() {
        let table = build(&[("en", ""), ("de", "A=1\n")], None);

        assert!(table.locales().iter().all(|locale| locale.slots().is_empty()));
        assert!(table.pool().is_empty());
    }

    /// `build`: values are pooled after transformation
    #[rstest]
    fn test_values_pooled_after_transform() {
        let ranges = parse_transform_table("20\t7e\t20\t*\n").unwrap();
        let mut transformer = CharTransformer::new(ranges, false);

        let table = build(&[("en", "CAFE=Cafe\n"), ("fr", "CAFE=Café\n")], Some(&mut transformer));

        assert_eq!(table.pool().len(), 1);
        assert_eq!(table.value("fr", "CAFE"), Some("Cafe"));
    }
}
