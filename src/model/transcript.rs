use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    language::{Language, LanguageDescriptor},
    model::{DURATION_TOLERANCE, Segment, Translation, Word},
    source::RawTranscription,
    text::{normalize_ws, or_placeholder},
};

/// The whole document: original text, ordered segments and the
/// document-level translation slot of every target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub original_language: String,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub translations: BTreeMap<Language, Translation>,
}

impl Transcript {
    /// Builds the model from a transcription result, with every
    /// translation slot of every target pending.
    ///
    /// Words may have zero length (`end == start`); engines emit those for
    /// very short tokens. Word starts must not go backwards across the
    /// whole transcript.
    pub fn from_raw(
        raw: RawTranscription,
        targets: &[LanguageDescriptor],
    ) -> Result<Self, ValidationError> {
        if raw.segments.is_empty() {
            return Err(ValidationError::NoSegments);
        }

        let pending = || -> BTreeMap<Language, Translation> {
            targets
                .iter()
                .map(|d| (d.language, Translation::pending(d.language, d.romanization)))
                .collect()
        };

        let mut segments = Vec::with_capacity(raw.segments.len());
        let mut transcript_index = 0usize;
        let mut previous_start: Option<f64> = None;

        for (index, seg) in raw.segments.into_iter().enumerate() {
            if seg.start < 0.0 {
                return Err(ValidationError::NegativeStart {
                    index,
                    start: seg.start,
                });
            }
            if seg.end <= seg.start {
                return Err(ValidationError::SegmentTiming {
                    index,
                    start: seg.start,
                    end: seg.end,
                });
            }

            let mut words = Vec::with_capacity(seg.words.len());
            for (word_index, w) in seg.words.into_iter().enumerate() {
                if w.end < w.start {
                    return Err(ValidationError::WordTiming {
                        segment: index,
                        word: word_index,
                        start: w.start,
                        end: w.end,
                    });
                }
                if let Some(previous) = previous_start.filter(|p| w.start < *p) {
                    return Err(ValidationError::WordOrder {
                        segment: index,
                        word: word_index,
                        start: w.start,
                        previous,
                    });
                }
                previous_start = Some(w.start);

                words.push(Word {
                    text: w.text.trim().to_string(),
                    start: w.start,
                    end: w.end,
                    index_in_segment: word_index,
                    index_in_transcript: transcript_index,
                });
                transcript_index += 1;
            }

            segments.push(Segment {
                start: seg.start,
                end: seg.end,
                duration: seg.end - seg.start,
                text: or_placeholder(&seg.text),
                words,
                translations: pending(),
                alignments: BTreeMap::new(),
            });
        }

        let text = normalize_ws(&raw.text);
        let text = if text.is_empty() {
            segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            text
        };

        Ok(Self {
            text,
            original_language: raw.language,
            segments,
            translations: pending(),
        })
    }

    /// Re-checks timing and index invariants, e.g. after reading a
    /// transcript back from JSON.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.segments.is_empty() {
            return Err(ValidationError::NoSegments);
        }
        let mut transcript_index = 0usize;
        let mut previous_start: Option<f64> = None;
        for (index, seg) in self.segments.iter().enumerate() {
            if seg.start < 0.0 {
                return Err(ValidationError::NegativeStart {
                    index,
                    start: seg.start,
                });
            }
            if seg.end <= seg.start {
                return Err(ValidationError::SegmentTiming {
                    index,
                    start: seg.start,
                    end: seg.end,
                });
            }
            if (seg.duration - (seg.end - seg.start)).abs() > DURATION_TOLERANCE {
                return Err(ValidationError::DurationMismatch {
                    index,
                    start: seg.start,
                    end: seg.end,
                    duration: seg.duration,
                });
            }
            for (word_index, w) in seg.words.iter().enumerate() {
                if w.end < w.start {
                    return Err(ValidationError::WordTiming {
                        segment: index,
                        word: word_index,
                        start: w.start,
                        end: w.end,
                    });
                }
                if let Some(previous) = previous_start.filter(|p| w.start < *p) {
                    return Err(ValidationError::WordOrder {
                        segment: index,
                        word: word_index,
                        start: w.start,
                        previous,
                    });
                }
                if w.index_in_segment != word_index || w.index_in_transcript != transcript_index {
                    return Err(ValidationError::WordIndex {
                        segment: index,
                        word: word_index,
                    });
                }
                previous_start = Some(w.start);
                transcript_index += 1;
            }
        }
        Ok(())
    }

    /// Target languages, in registry order.
    pub fn target_languages(&self) -> Vec<Language> {
        self.translations.keys().copied().collect()
    }

    /// True when the document and every segment carry a resolved
    /// translation for every target language.
    pub fn is_translated(&self) -> bool {
        !self.translations.is_empty()
            && self.translations.values().all(|t| !t.is_pending())
            && self.segments.iter().all(|s| {
                self.translations
                    .keys()
                    .all(|l| s.translated(*l).is_some())
            })
    }

    pub fn duration(&self) -> f64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => last.end - first.start,
            _ => 0.0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }
}
