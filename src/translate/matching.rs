//! Applies model word-alignment output to a segment.
//!
//! The model proposes a translated word (text and index) for each original
//! word. The final choice is made here so that it is deterministic:
//!
//! 1. If the proposed text occurs in the translated word list, take the
//!    occurrence closest to the original word's index. Equidistant
//!    occurrences resolve to the lower index.
//! 2. Otherwise use the proposed index when it is in range.
//! 3. Otherwise clamp the index into range.
//! 4. An original word the model skipped gets the last translated word.
//!
//! Several original words may share one translated word.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    llm::{MatchedSegmentResponse, WordMatchResponse},
    model::{MatchedSegment, MatchedWord, Segment, TranslatedText},
    text::match_key,
};

/// Picks the translated word index for one original word.
///
/// `translated_words` must not be empty.
pub fn choose_translated_index(
    translated_words: &[String],
    candidate_text: &str,
    proposed: Option<i64>,
    original_index: usize,
) -> usize {
    let last = translated_words.len().saturating_sub(1);

    let key = match_key(candidate_text);
    if !key.is_empty() {
        let closest = translated_words
            .iter()
            .enumerate()
            .filter(|(_, w)| match_key(w) == key)
            .map(|(i, _)| i)
            .min_by_key(|i| (i.abs_diff(original_index), *i));
        if let Some(i) = closest {
            return i;
        }
    }

    match proposed {
        Some(p) if p >= 0 && (p as usize) <= last => p as usize,
        Some(p) => {
            let clamped = if p < 0 { 0 } else { last };
            warn!(
                proposed = p,
                clamped,
                words = translated_words.len(),
                "translated word index out of range, clamping"
            );
            clamped
        }
        None => {
            warn!(original_index, "no translated word proposed, using last word");
            last
        }
    }
}

/// Builds the [`MatchedSegment`] for one segment from the model's answer.
///
/// Exactly one [`MatchedWord`] is produced per original word, in original
/// order. Duplicate entries for the same original index keep the first;
/// entries for indices the segment does not have are ignored.
pub fn align_segment(
    segment: &Segment,
    translation: &TranslatedText,
    response: MatchedSegmentResponse,
) -> MatchedSegment {
    let language = translation.language;
    let translated_words = translation.word_list();
    let romanized_words = if translation.romanization.is_none() {
        None
    } else {
        translation.romanized_word_list()
    };
    let romanized_by_index = romanized_words
        .as_ref()
        .filter(|r| r.len() == translated_words.len());

    let mut entries: BTreeMap<usize, WordMatchResponse> = BTreeMap::new();
    for entry in response.matched_words {
        let index = entry.original_word_index;
        if index >= segment.words.len() {
            warn!(
                language = language.iso_code(),
                index,
                words = segment.words.len(),
                "ignoring match for nonexistent original word"
            );
            continue;
        }
        entries.entry(index).or_insert(entry);
    }

    let matched_words = segment
        .words
        .iter()
        .map(|word| {
            let i = word.index_in_segment;
            let entry = entries.get(&i);
            if entry.is_none() {
                warn!(
                    language = language.iso_code(),
                    original_word = i,
                    "original word left unmatched, using last translated word"
                );
            }
            let chosen = choose_translated_index(
                &translated_words,
                entry.map(|e| e.translated_word_text.as_str()).unwrap_or(""),
                entry.map(|e| e.translated_word_index),
                i,
            );
            let romanized = if translation.romanization.is_none() {
                None
            } else if let Some(list) = romanized_by_index {
                list.get(chosen).cloned()
            } else {
                entry
                    .and_then(|e| e.translated_word_romanized_text.as_deref())
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
            };
            MatchedWord::for_word(word, chosen, translated_words[chosen].clone(), romanized)
        })
        .collect();

    MatchedSegment {
        language,
        translated_words,
        romanized_words,
        matched_words,
    }
}
