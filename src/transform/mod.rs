//! Character transformation into the narrow target encoding.
//!
//! Each codepoint of a value is resolved through the transform ranges:
//!
//! 1. a range containing the codepoint maps it directly;
//! 2. otherwise the canonical decomposition (NFD) minus combining marks is
//!    tried, so accented letters fall back to their plain base letter;
//! 3. otherwise the placeholder `?` is used.
//!
//! The result is the body of a C string literal: printable ASCII targets are
//! written as-is, everything else as a three-digit octal escape. A `?` that
//! follows another `?` is escaped too, so the body never contains a trigraph.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use unicode_normalization::char::{
    decompose_canonical,
    is_combining_mark,
};

use crate::input::transform_table::TransformRange;

/// Substitute for codepoints that cannot be mapped.
pub const PLACEHOLDER: char = '?';

/// How a single codepoint was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Mapped by a range.
    Direct(u32),
    /// Mapped after stripping combining marks from the decomposition.
    Decomposed(u32),
    /// No mapping; [`PLACEHOLDER`] is emitted.
    Placeholder,
}

impl Resolution {
    /// Target codepoint to emit.
    #[must_use]
    pub const fn target(self) -> u32 {
        match self {
            Self::Direct(target) | Self::Decomposed(target) => target,
            Self::Placeholder => PLACEHOLDER as u32,
        }
    }
}

/// Resolves values through the transform ranges and tracks unmapped codepoints.
#[derive(Debug, Clone)]
pub struct CharTransformer {
    /// Ranges in table order; the first match wins
    ranges: Vec<TransformRange>,
    /// Skip ranges not declared for the locale
    enforce_locale_scope: bool,
    /// Codepoints already reported as unmapped.
    reported: BTreeSet<char>,
}

impl CharTransformer {
    /// With `enforce_locale_scope` unset every range applies to every locale.
    #[must_use]
    pub const fn new(ranges: Vec<TransformRange>, enforce_locale_scope: bool) -> Self {
        Self { ranges, enforce_locale_scope, reported: BTreeSet::new() }
    }

    /// Target of the first applicable range containing `codepoint`.
    fn lookup(&self, locale: &str, codepoint: u32) -> Option<u32> {
        self.ranges
            .iter()
            .filter(|range| !self.enforce_locale_scope || range.locales.includes(locale))
            .find_map(|range| range.map(codepoint))
    }

    /// Target of the single non-combining character in the decomposition of `c`.
    fn lookup_base(&self, locale: &str, c: char) -> Option<u32> {
        let mut bases = Vec::new();
        decompose_canonical(c, |d| {
            if !is_combining_mark(d) {
                bases.push(d);
            }
        });
        match bases.as_slice() {
            [base] if *base != c => self.lookup(locale, u32::from(*base)),
            _ => None,
        }
    }

    /// Resolves one codepoint, warning the first time it is unmapped.
    pub fn resolve(&mut self, locale: &str, c: char) -> Resolution {
        if let Some(target) = self.lookup(locale, u32::from(c)) {
            return Resolution::Direct(target);
        }

        if self.reported.insert(c) {
            tracing::warn!(
                locale,
                codepoint = %format!("U+{:04X}", u32::from(c)),
                character = %c,
                "Character has no mapping in the transform table"
            );
        }

        self.lookup_base(locale, c).map_or(Resolution::Placeholder, Resolution::Decomposed)
    }

    /// Rewrites `raw` into a C string literal body for `locale`.
    pub fn transform(&mut self, locale: &str, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            let target = self.resolve(locale, c).target();
            push_target(&mut out, target);
        }
        out
    }

    /// Every codepoint that missed the transform table so far, ascending.
    pub fn unmapped(&self) -> impl Iterator<Item = char> + '_ {
        self.reported.iter().copied()
    }
}

/// Appends `target` to a C string literal body.
fn push_target(out: &mut String, target: u32) {
    match char::from_u32(target) {
        Some(PLACEHOLDER) if out.ends_with(PLACEHOLDER) => out.push_str("\\077"),
        Some(c) if (' '..='~').contains(&c) && c != '"' && c != '\\' => out.push(c),
        _ => {
            // Writing to a String cannot fail.
            let _ = write!(out, "\\{target:03o}");
        }
    }
}
