//! Localized text: either a plain string or a per-language mapping.
//!
//! Question text and options come in two shapes on the wire: a bare
//! string, or an object keyed by language code with `en` as the
//! mandated fallback. `#[serde(untagged)]` accepts both without any
//! discriminator field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A string that may carry translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// A single untranslated string.
    Plain(String),
    /// Language code → text. `en` is the required fallback key.
    ByLang(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Resolves to a display string for the requested language.
    ///
    /// Resolution order: exact language match, then `en`, then any
    /// entry at all (maps without `en` are tolerated rather than
    /// rejected), then the empty string.
    pub fn resolve(&self, lang: &str) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::ByLang(map) => map
                .get(lang)
                .or_else(|| map.get("en"))
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }

    /// Whether there is any non-empty text to show at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(s) => s.trim().is_empty(),
            Self::ByLang(map) => map.values().all(|s| s.trim().is_empty()),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for LocalizedText {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}
