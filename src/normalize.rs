//! Name normalization for citation matching.
//!
//! Citation strings and roster names are compared only after both went
//! through [`NameNormalizer::normalize`]:
//! - Convert to lowercase
//! - Fold Latin-extended letters through a fixed table (`đ` → `dj`, `ł` → `l`)
//! - Remove any remaining combining diacritical marks (`é` → `e`)
//! - Fold once more, for letters whose decomposed base is in the table
//! - Remove commas, which would otherwise break ordering against rendered keys
//! - Trim surrounding whitespace
//!
//! The result is idempotent: normalizing a normalized string returns it as is.

use crate::error::{BibError, Result};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Letters folded before decomposition. Covers letters that NFD leaves alone
/// and letters whose conventional transliteration is longer than one char.
const DEFAULT_FOLDS: &[(char, &str)] = &[
    // Serbian / Croatian
    ('đ', "dj"),
    ('š', "s"),
    ('č', "c"),
    ('ć', "c"),
    ('ž', "z"),
    // Polish
    ('ł', "l"),
    ('ś', "s"),
    ('ź', "z"),
    ('ż', "z"),
    // Nordic
    ('ø', "o"),
    ('æ', "ae"),
    ('å', "a"),
    // German
    ('ß', "ss"),
    // Icelandic
    ('ð', "d"),
    ('þ', "th"),
    // Turkish
    ('ı', "i"),
    ('ş', "s"),
    ('ğ', "g"),
    // French
    ('œ', "oe"),
];

/// Folds case, diacritics and punctuation into a comparable form.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    folds: HashMap<char, String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS
                .iter()
                .map(|(from, to)| (*from, to.to_string()))
                .collect(),
        }
    }
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a fold.
    ///
    /// `from` must be a lowercase non-ASCII letter and `to` lowercase ASCII
    /// letters, otherwise the fold could change an already-normalized string.
    pub fn with_mapping(mut self, from: char, to: &str) -> Result<Self> {
        if from.is_ascii() || from.is_uppercase() {
            return Err(BibError::Validation(format!(
                "fold source '{}' must be a lowercase non-ASCII character",
                from
            )));
        }
        if !to.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(BibError::Validation(format!(
                "fold target '{}' for '{}' must be lowercase ASCII letters",
                to, from
            )));
        }
        self.folds.insert(from, to.to_string());
        Ok(self)
    }

    /// Normalize a raw name token.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibresolve::normalize::NameNormalizer;
    ///
    /// let normalizer = NameNormalizer::new();
    /// assert_eq!(normalizer.normalize("Đorđević, Đ."), "djordjevic dj.");
    /// assert_eq!(normalizer.normalize("Jovanović A."), "jovanovic a.");
    /// ```
    pub fn normalize(&self, raw: &str) -> String {
        let folded = self.fold(&raw.to_lowercase());

        let stripped: String = folded
            .nfd()
            .filter(|c| !is_combining_mark(*c) && *c != ',')
            .collect();

        // a decomposed letter may expose a base that is itself in the table (ǿ -> ø)
        self.fold(&stripped).trim().to_string()
    }

    fn fold(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match self.folds.get(&c) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }
}

/// Check if a character is a combining diacritical mark.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}'
    )
}
