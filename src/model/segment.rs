use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    language::Language,
    model::{MatchedSegment, TranslatedText, Translation, Word},
};

/// A contiguous span of speech with its words and per-language payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub text: String,
    pub words: Vec<Word>,
    #[serde(default)]
    pub translations: BTreeMap<Language, Translation>,
    #[serde(default)]
    pub alignments: BTreeMap<Language, MatchedSegment>,
}

impl Segment {
    pub fn translation(&self, language: Language) -> Option<&Translation> {
        self.translations.get(&language)
    }

    /// Resolved translation for `language`, if it has arrived.
    pub fn translated(&self, language: Language) -> Option<&TranslatedText> {
        self.translation(language).and_then(Translation::resolved)
    }

    pub fn alignment(&self, language: Language) -> Option<&MatchedSegment> {
        self.alignments.get(&language)
    }
}
