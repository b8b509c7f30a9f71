//! Title normalization for equality comparison.
//!
//! Two titles name the same movie iff their keys are equal. Keys are derived on
//! demand and never stored.

use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Canonical equality key for a free-text title
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TitleKey(String);

impl TitleKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty keys are never a valid match target.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TitleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a title into its equality key
///
/// This function:
/// 1. Composes Unicode to NFC (decomposed Hangul and accents compare equal)
/// 2. Lower-cases
/// 3. Drops every non-alphanumeric character (whitespace, punctuation, symbols, `_`)
/// 4. Re-composes, since dropping separators can leave composable neighbours
pub fn normalize(text: &str) -> TitleKey {
    let lowered = text.nfc().collect::<String>().to_lowercase();
    let stripped: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
    TitleKey(stripped.nfc().collect())
}

/// Normalize an optional title; absent input yields the empty key.
pub fn normalize_opt(text: Option<&str>) -> TitleKey {
    text.map(normalize).unwrap_or_else(|| TitleKey(String::new()))
}
