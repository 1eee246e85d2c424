use serde::{Deserialize, Serialize};

use crate::{language::Language, model::Word};

/// One original word paired with the translated word that carries its meaning.
///
/// Timing always comes from the original word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedWord {
    pub original_word_index: usize,
    pub original_word_text: String,
    pub translated_word_index: usize,
    pub translated_word_text: String,
    pub romanized: Option<String>,
    pub start: f64,
    pub end: f64,
}

impl MatchedWord {
    pub fn for_word(
        word: &Word,
        translated_word_index: usize,
        translated_word_text: impl Into<String>,
        romanized: Option<String>,
    ) -> Self {
        Self {
            original_word_index: word.index_in_segment,
            original_word_text: word.text.clone(),
            translated_word_index,
            translated_word_text: translated_word_text.into(),
            romanized,
            start: word.start,
            end: word.end,
        }
    }
}

/// Word alignment of one segment into one target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSegment {
    pub language: Language,
    pub translated_words: Vec<String>,
    pub romanized_words: Option<Vec<String>>,
    pub matched_words: Vec<MatchedWord>,
}

impl MatchedSegment {
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            translated_words: Vec::new(),
            romanized_words: None,
            matched_words: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_word_inherits_original_timing() {
        let word = Word {
            text: "you".to_string(),
            start: 1.25,
            end: 1.5,
            index_in_segment: 2,
            index_in_transcript: 9,
        };
        let m = MatchedWord::for_word(&word, 0, "tú", None);
        assert_eq!(m.original_word_index, 2);
        assert_eq!(m.original_word_text, "you");
        assert_eq!((m.start, m.end), (1.25, 1.5));
    }
}
