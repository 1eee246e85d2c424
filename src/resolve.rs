//! Finds what is on screen at a given time.
//!
//! An item is active from its own start up to the start of the next item,
//! so silence between two items belongs to the earlier one. The last item
//! ends at its own end. Times past the end clamp to the last item; times
//! before the first segment clamp to the first segment and its first word.
//!
//! A time on the boundary between two segments belongs to the earlier
//! segment. Between two words the later word wins, since it starts
//! being spoken at that instant.

use std::collections::BTreeMap;

use crate::{
    language::Language,
    model::{MatchedWord, Segment, Transcript, Word},
};

/// Everything active at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveContent<'a> {
    pub segment_index: usize,
    pub segment: &'a Segment,
    /// `None` only when the segment has no words.
    pub word: Option<&'a Word>,
    /// One entry per language with a non-empty alignment on the segment.
    pub matched_words: BTreeMap<Language, &'a MatchedWord>,
}

/// Which item takes a time shared by the end of one window and the start
/// of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Earlier,
    Later,
}

/// Resolves the active segment, word and per-language matched word at `t`
/// seconds. Returns `None` only for a transcript without segments.
pub fn resolve(transcript: &Transcript, t: f64) -> Option<ActiveContent<'_>> {
    let segments = &transcript.segments;
    let first = segments.first()?;

    if t < first.start {
        return Some(ActiveContent {
            segment_index: 0,
            segment: first,
            word: first.words.first(),
            matched_words: first
                .alignments
                .iter()
                .filter_map(|(language, aligned)| {
                    aligned.matched_words.first().map(|m| (*language, m))
                })
                .collect(),
        });
    }

    let segment_index = active_index(segments, t, Boundary::Earlier, |s| (s.start, s.end))?;
    let segment = &segments[segment_index];

    let word = active_index(&segment.words, t, Boundary::Later, |w| (w.start, w.end))
        .map(|i| &segment.words[i]);

    let matched_words = segment
        .alignments
        .iter()
        .filter_map(|(language, aligned)| {
            active_index(&aligned.matched_words, t, Boundary::Later, |m| {
                (m.start, m.end)
            })
            .map(|i| (*language, &aligned.matched_words[i]))
        })
        .collect();

    Some(ActiveContent {
        segment_index,
        segment,
        word,
        matched_words,
    })
}

/// Index of the item whose window contains `t`, else the last index.
/// `None` only for an empty slice.
fn active_index<T>(
    items: &[T],
    t: f64,
    boundary: Boundary,
    span: impl Fn(&T) -> (f64, f64),
) -> Option<usize> {
    let last = items.len().checked_sub(1)?;
    let contains = |i: usize| {
        let (start, own_end) = span(&items[i]);
        let effective_end = items.get(i + 1).map_or(own_end, |next| span(next).0);
        start <= t && t <= effective_end
    };
    let hit = match boundary {
        Boundary::Earlier => (0..items.len()).find(|&i| contains(i)),
        Boundary::Later => (0..items.len()).rev().find(|&i| contains(i)),
    };
    Some(hit.unwrap_or(last))
}
