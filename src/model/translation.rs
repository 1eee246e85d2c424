use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    language::{Language, RomanizationMethod},
    text::{EMPTY_TEXT, or_placeholder},
};

/// Display form of a translation slot that has not been filled yet.
pub const NOT_YET_TRANSLATED: &str = "NOT YET TRANSLATED";

/// A completed translation of some original text into one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub text: String,
    pub romanized: Option<String>,
    pub language: Language,
    pub romanization: RomanizationMethod,
}

impl TranslatedText {
    /// Blank text becomes the `...` placeholder. Romanization is dropped
    /// when the method is `none` or the model answered with nothing usable.
    pub fn new(
        language: Language,
        romanization: RomanizationMethod,
        text: &str,
        romanized: Option<&str>,
    ) -> Self {
        let romanized = if romanization.is_none() {
            None
        } else {
            romanized
                .map(or_placeholder)
                .filter(|r| r != EMPTY_TEXT && !r.eq_ignore_ascii_case("none"))
        };
        Self {
            text: or_placeholder(text),
            romanized,
            language,
            romanization,
        }
    }

    /// Translated words used for alignment; never empty.
    pub fn word_list(&self) -> Vec<String> {
        let words = self.language.split_words(&self.text);
        if words.is_empty() {
            vec![EMPTY_TEXT.to_string()]
        } else {
            words
        }
    }

    pub fn romanized_word_list(&self) -> Option<Vec<String>> {
        self.romanized
            .as_deref()
            .map(|r| r.split_whitespace().map(str::to_string).collect())
    }

    pub fn has_romanization(&self) -> bool {
        !self.romanization.is_none() && self.romanized.is_some()
    }
}

/// Per-language translation slot.
///
/// A pending slot carries no text at all, so there is nothing to read
/// by mistake before the translation arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Translation {
    Pending {
        language: Language,
        romanization: RomanizationMethod,
    },
    Resolved(TranslatedText),
}

impl Translation {
    pub fn pending(language: Language, romanization: RomanizationMethod) -> Self {
        Translation::Pending {
            language,
            romanization,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Translation::Pending { .. })
    }

    pub fn resolved(&self) -> Option<&TranslatedText> {
        match self {
            Translation::Resolved(t) => Some(t),
            Translation::Pending { .. } => None,
        }
    }

    pub fn romanization(&self) -> RomanizationMethod {
        match self {
            Translation::Pending { romanization, .. } => *romanization,
            Translation::Resolved(t) => t.romanization,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::Pending { .. } => f.write_str(NOT_YET_TRANSLATED),
            Translation::Resolved(t) => f.write_str(&t.text),
        }
    }
}
