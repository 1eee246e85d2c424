//! Subtitle synthesis: projects a transcript into SRT, VTT and Markdown.
//!
//! A transcript becomes one [`SubtitleTrack`] for the original speech and
//! one per translated language. Each track is rendered in every requested
//! format for every variant it supports. Nothing here touches the disk.

pub mod markdown;
pub mod srt;
pub mod time;
pub mod vtt;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use textwrap::wrap;
use tracing::debug;

use crate::{
    config::Formats,
    error::SubtitleError,
    language::{Language, RomanizationMethod},
    model::Transcript,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Md,
}

impl SubtitleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
            SubtitleFormat::Md => "md",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleVariant {
    OriginalSpoken,
    TranslationOnly,
    TranslationWithRomanization,
    MultiLanguage,
}

impl SubtitleVariant {
    pub fn name(self) -> &'static str {
        match self {
            SubtitleVariant::OriginalSpoken => "original_spoken",
            SubtitleVariant::TranslationOnly => "translation_only",
            SubtitleVariant::TranslationWithRomanization => "translation_with_romanization",
            SubtitleVariant::MultiLanguage => "multi_language",
        }
    }
}

impl fmt::Display for SubtitleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text of one segment as a subtitle track sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub original: String,
    pub translated: Option<String>,
    pub romanized: Option<String>,
}

impl SubtitleCue {
    /// Translated text, falling back to the original for the original track.
    pub fn translated_or_original(&self) -> &str {
        self.translated.as_deref().unwrap_or(&self.original)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Original,
    Translated(Language),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    pub kind: TrackKind,
    pub original_language: String,
    pub romanization: RomanizationMethod,
    pub cues: Vec<SubtitleCue>,
}

impl SubtitleTrack {
    pub fn original(transcript: &Transcript) -> Self {
        Self {
            kind: TrackKind::Original,
            original_language: transcript.original_language.clone(),
            romanization: RomanizationMethod::None,
            cues: transcript
                .segments
                .iter()
                .map(|s| SubtitleCue {
                    start: s.start,
                    end: s.end,
                    original: s.text.trim().to_string(),
                    translated: None,
                    romanized: None,
                })
                .collect(),
        }
    }

    /// Track for one target language. Fails if any segment's translation
    /// has not arrived yet.
    pub fn translated(transcript: &Transcript, language: Language) -> Result<Self, SubtitleError> {
        let romanization = transcript
            .translations
            .get(&language)
            .map(|t| t.romanization())
            .ok_or(SubtitleError::Pending {
                language,
                segment: None,
            })?;

        let cues = transcript
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let t = s.translated(language).ok_or(SubtitleError::Pending {
                    language,
                    segment: Some(i),
                })?;
                Ok(SubtitleCue {
                    start: s.start,
                    end: s.end,
                    original: s.text.trim().to_string(),
                    translated: Some(t.text.trim().to_string()),
                    romanized: t.romanized.as_deref().map(|r| r.trim().to_string()),
                })
            })
            .collect::<Result<Vec<_>, SubtitleError>>()?;

        Ok(Self {
            kind: TrackKind::Translated(language),
            original_language: transcript.original_language.clone(),
            romanization,
            cues,
        })
    }

    /// Variants this track can be rendered as. Romanized output is only
    /// offered when the language has a romanization method.
    pub fn variants(&self) -> Vec<SubtitleVariant> {
        match self.kind {
            TrackKind::Original => vec![SubtitleVariant::OriginalSpoken],
            TrackKind::Translated(_) => {
                let mut v = vec![SubtitleVariant::TranslationOnly];
                if self.has_romanization() {
                    v.push(SubtitleVariant::TranslationWithRomanization);
                }
                v.push(SubtitleVariant::MultiLanguage);
                v
            }
        }
    }

    pub fn has_romanization(&self) -> bool {
        matches!(self.kind, TrackKind::Translated(_)) && !self.romanization.is_none()
    }

    /// `original` or the language's ISO code; used in artifact names.
    pub fn label(&self) -> &'static str {
        match self.kind {
            TrackKind::Original => "original",
            TrackKind::Translated(l) => l.iso_code(),
        }
    }

    pub fn language(&self) -> Option<Language> {
        match self.kind {
            TrackKind::Original => None,
            TrackKind::Translated(l) => Some(l),
        }
    }

    /// Body lines of one cue for `variant`, without any format markup.
    pub fn lines(&self, cue: &SubtitleCue, variant: SubtitleVariant) -> Vec<String> {
        let translated = cue.translated_or_original().to_string();
        match variant {
            SubtitleVariant::OriginalSpoken => vec![cue.original.clone()],
            SubtitleVariant::TranslationOnly => vec![translated],
            SubtitleVariant::TranslationWithRomanization => {
                let mut lines = vec![translated];
                lines.extend(cue.romanized.clone());
                lines
            }
            SubtitleVariant::MultiLanguage => {
                let mut lines = vec![cue.original.clone(), translated];
                if self.has_romanization() {
                    lines.extend(cue.romanized.clone());
                }
                lines
            }
        }
    }
}

/// Timing checks shared by every encoder; run before any text is produced.
pub fn validate_cues(cues: &[SubtitleCue]) -> Result<(), SubtitleError> {
    if cues.is_empty() {
        return Err(SubtitleError::Empty);
    }
    let mut previous_end: Option<f64> = None;
    for (index, cue) in cues.iter().enumerate() {
        if cue.end <= cue.start {
            return Err(SubtitleError::InvalidTiming {
                index,
                start: cue.start,
                end: cue.end,
            });
        }
        if let Some(previous_end) = previous_end.filter(|e| cue.start < *e) {
            return Err(SubtitleError::Overlap {
                index,
                start: cue.start,
                previous_end,
            });
        }
        previous_end = Some(cue.end);
    }
    Ok(())
}

pub trait SubtitleEncoder {
    /// Renders an already validated track.
    fn encode(&self, track: &SubtitleTrack, variant: SubtitleVariant) -> String;
}

pub fn encoder_for(format: SubtitleFormat, cfg: &Formats) -> Box<dyn SubtitleEncoder + '_> {
    match format {
        SubtitleFormat::Srt => Box::new(srt::SrtEncoder::new(&cfg.srt)),
        SubtitleFormat::Vtt => Box::new(vtt::VttEncoder::new(&cfg.vtt)),
        SubtitleFormat::Md => Box::new(markdown::MarkdownEncoder::new(&cfg.markdown)),
    }
}

/// Validates `track` and renders every variant it supports.
pub fn format_track(
    encoder: &dyn SubtitleEncoder,
    track: &SubtitleTrack,
) -> Result<Vec<(SubtitleVariant, String)>, SubtitleError> {
    validate_cues(&track.cues)?;
    Ok(track
        .variants()
        .into_iter()
        .map(|v| (v, encoder.encode(track, v)))
        .collect())
}

/// One rendered subtitle document.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleArtifact {
    pub track: &'static str,
    pub format: SubtitleFormat,
    pub variant: SubtitleVariant,
    pub content: String,
}

impl SubtitleArtifact {
    /// `<stem>_<track>_<variant>.<ext>`
    pub fn file_name(&self, stem: &str) -> String {
        format!(
            "{stem}_{}_{}.{}",
            self.track,
            self.variant,
            self.format.extension()
        )
    }
}

/// Checks segment timing without rendering anything. Every track shares
/// the segment timing, so this holds for translated tracks as well.
pub fn check_timing(transcript: &Transcript) -> Result<(), SubtitleError> {
    validate_cues(&SubtitleTrack::original(transcript).cues)
}

/// Every track of `transcript` that can be rendered: the original speech,
/// plus one per target language.
pub fn tracks(transcript: &Transcript) -> Result<Vec<SubtitleTrack>, SubtitleError> {
    let mut tracks = vec![SubtitleTrack::original(transcript)];
    for language in transcript.target_languages() {
        tracks.push(SubtitleTrack::translated(transcript, language)?);
    }
    Ok(tracks)
}

/// Renders `transcript` in every requested format. All tracks are
/// validated before anything is encoded.
pub fn synthesize(
    transcript: &Transcript,
    formats: &[SubtitleFormat],
    cfg: &Formats,
) -> Result<Vec<SubtitleArtifact>, SubtitleError> {
    let tracks = tracks(transcript)?;
    for track in &tracks {
        validate_cues(&track.cues)?;
    }

    let mut artifacts = Vec::new();
    for format in formats {
        let encoder = encoder_for(*format, cfg);
        for track in &tracks {
            for (variant, content) in format_track(encoder.as_ref(), track)? {
                debug!(
                    track = track.label(),
                    format = format.extension(),
                    %variant,
                    bytes = content.len(),
                    "rendered subtitles"
                );
                artifacts.push(SubtitleArtifact {
                    track: track.label(),
                    format: *format,
                    variant,
                    content,
                });
            }
        }
    }
    Ok(artifacts)
}

/// Hard-wraps each line at `width` characters; no-op without a width.
pub(crate) fn wrap_lines(lines: &[String], width: Option<usize>) -> Vec<String> {
    match width {
        Some(w) if w > 0 => lines
            .iter()
            .flat_map(|l| wrap(l, w).into_iter().map(|c| c.into_owned()).collect::<Vec<_>>())
            .collect(),
        _ => lines.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        language::LanguageRegistry,
        model::{TranslatedText, Translation},
        source::{RawSegment, RawTranscription},
    };

    fn transcript(langs: &[Language]) -> Transcript {
        let registry = LanguageRegistry::builtin();
        let targets: Vec<_> = langs
            .iter()
            .map(|l| registry.get(*l).unwrap().clone())
            .collect();
        let raw = RawTranscription {
            text: "hi there".to_string(),
            language: "english".to_string(),
            segments: vec![
                RawSegment {
                    start: 0.0,
                    end: 1.0,
                    text: "hi".to_string(),
                    words: vec![],
                },
                RawSegment {
                    start: 1.0,
                    end: 2.0,
                    text: "there".to_string(),
                    words: vec![],
                },
            ],
        };
        let mut t = Transcript::from_raw(raw, &targets).unwrap();
        for d in &targets {
            for seg in &mut t.segments {
                let text = format!("{}-{}", d.iso_code, seg.text);
                seg.translations.insert(
                    d.language,
                    Translation::Resolved(TranslatedText::new(
                        d.language,
                        d.romanization,
                        &text,
                        Some("rom"),
                    )),
                );
            }
        }
        t
    }

    #[test]
    fn untranslated_transcript_yields_only_original_variant() {
        let t = transcript(&[]);
        let artifacts = synthesize(&t, &[SubtitleFormat::Srt], &Formats::default()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].variant, SubtitleVariant::OriginalSpoken);
        assert_eq!(artifacts[0].file_name("talk"), "talk_original_original_spoken.srt");
    }

    #[test]
    fn romanized_variant_only_for_romanized_languages() {
        let t = transcript(&[Language::Spanish, Language::ChineseMandarinSimplified]);
        let artifacts = synthesize(&t, &[SubtitleFormat::Vtt], &Formats::default()).unwrap();
        let variants_for = |track: &str| -> Vec<SubtitleVariant> {
            artifacts
                .iter()
                .filter(|a| a.track == track)
                .map(|a| a.variant)
                .collect()
        };
        assert_eq!(
            variants_for("es"),
            vec![SubtitleVariant::TranslationOnly, SubtitleVariant::MultiLanguage]
        );
        assert_eq!(
            variants_for("zh"),
            vec![
                SubtitleVariant::TranslationOnly,
                SubtitleVariant::TranslationWithRomanization,
                SubtitleVariant::MultiLanguage
            ]
        );
    }

    #[test]
    fn timing_is_checked_before_any_translation() {
        let mut t = transcript(&[Language::Spanish]);
        t.segments[1].start = 0.5;
        t.segments[1].duration = 1.5;
        assert!(matches!(
            check_timing(&t),
            Err(SubtitleError::Overlap { index: 1, .. })
        ));
        assert_eq!(check_timing(&transcript(&[])), Ok(()));
    }

    #[test]
    fn pending_segment_blocks_synthesis() {
        let mut t = transcript(&[Language::French]);
        t.segments[1].translations.insert(
            Language::French,
            Translation::pending(Language::French, RomanizationMethod::None),
        );
        let err = synthesize(&t, &[SubtitleFormat::Md], &Formats::default()).unwrap_err();
        assert_eq!(
            err,
            SubtitleError::Pending {
                language: Language::French,
                segment: Some(1)
            }
        );
    }

    #[test]
    fn validation_rejects_overlap_and_inverted_timing() {
        let cue = |start: f64, end: f64| SubtitleCue {
            start,
            end,
            original: "x".to_string(),
            translated: None,
            romanized: None,
        };
        assert_eq!(validate_cues(&[]), Err(SubtitleError::Empty));
        assert!(matches!(
            validate_cues(&[cue(0.0, 1.0), cue(2.0, 2.0)]),
            Err(SubtitleError::InvalidTiming { index: 1, .. })
        ));
        assert!(matches!(
            validate_cues(&[cue(0.0, 1.0), cue(0.5, 2.0)]),
            Err(SubtitleError::Overlap { index: 1, .. })
        ));
        assert!(validate_cues(&[cue(0.0, 1.0), cue(1.0, 2.0)]).is_ok());
    }

    #[test]
    fn wrap_lines_splits_long_lines() {
        let lines = vec!["one two three four".to_string()];
        assert_eq!(wrap_lines(&lines, Some(9)), vec!["one two", "three", "four"]);
        assert_eq!(wrap_lines(&lines, None), lines);
    }
}
