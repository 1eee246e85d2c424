use crate::{
    config::MarkdownCfg,
    formats::{
        SubtitleEncoder, SubtitleTrack, SubtitleVariant,
        time::{format_vtt_timestamp, seconds_to_ms},
    },
};

/// Readable transcript document: one `[timestamp] text` paragraph per cue.
pub struct MarkdownEncoder<'a> {
    cfg: &'a MarkdownCfg,
}

impl<'a> MarkdownEncoder<'a> {
    pub fn new(cfg: &'a MarkdownCfg) -> Self {
        Self { cfg }
    }

    fn title(&self, variant: SubtitleVariant) -> String {
        match variant {
            SubtitleVariant::TranslationWithRomanization => {
                format!("# {} with Romanization", self.cfg.title)
            }
            SubtitleVariant::MultiLanguage => format!("# {} (Multi-Language)", self.cfg.title),
            _ => format!("# {}", self.cfg.title),
        }
    }

    fn metadata(&self, track: &SubtitleTrack) -> Vec<String> {
        let mut lines = vec![format!("- Original language: {}", track.original_language)];
        if let Some(language) = track.language() {
            lines.push(format!(
                "- Translated language: {} ({})",
                language,
                language.iso_code()
            ));
            lines.push(format!("- Romanization: {}", track.romanization));
        }
        lines
    }
}

impl SubtitleEncoder for MarkdownEncoder<'_> {
    fn encode(&self, track: &SubtitleTrack, variant: SubtitleVariant) -> String {
        let mut blocks = vec![self.title(variant), self.metadata(track).join("\n")];

        for cue in &track.cues {
            let stamp = format_vtt_timestamp(seconds_to_ms(cue.start));
            let translated = cue.translated_or_original();
            let block = match variant {
                SubtitleVariant::OriginalSpoken => format!("[{stamp}] {}", cue.original),
                SubtitleVariant::TranslationOnly => format!("[{stamp}] {translated}"),
                SubtitleVariant::TranslationWithRomanization => match &cue.romanized {
                    Some(r) => format!("[{stamp}] {translated}\n_{r}_"),
                    None => format!("[{stamp}] {translated}"),
                },
                SubtitleVariant::MultiLanguage => {
                    let mut lines = vec![
                        format!("[{stamp}]"),
                        format!("> {}", cue.original),
                        format!("> {translated}"),
                    ];
                    if let Some(r) = cue.romanized.as_ref().filter(|_| track.has_romanization()) {
                        lines.push(format!("> _{r}_"));
                    }
                    lines.join("\n")
                }
            };
            blocks.push(block);
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formats::{SubtitleCue, TrackKind},
        language::{Language, RomanizationMethod},
    };

    fn track(kind: TrackKind, romanization: RomanizationMethod) -> SubtitleTrack {
        SubtitleTrack {
            kind,
            original_language: "english".to_string(),
            romanization,
            cues: vec![SubtitleCue {
                start: 61.25,
                end: 62.0,
                original: "thank you".to_string(),
                translated: Some("спасибо".to_string()),
                romanized: Some("spasibo".to_string()),
            }],
        }
    }

    #[test]
    fn original_document() {
        let cfg = MarkdownCfg::default();
        let out = MarkdownEncoder::new(&cfg).encode(
            &track(TrackKind::Original, RomanizationMethod::None),
            SubtitleVariant::OriginalSpoken,
        );
        assert_eq!(
            out,
            "# Transcript\n\n- Original language: english\n\n[00:01:01.250] thank you\n"
        );
    }

    #[test]
    fn romanized_document_italicizes_romanization() {
        let cfg = MarkdownCfg::default();
        let out = MarkdownEncoder::new(&cfg).encode(
            &track(TrackKind::Translated(Language::Russian), RomanizationMethod::Iso9),
            SubtitleVariant::TranslationWithRomanization,
        );
        assert!(out.starts_with("# Transcript with Romanization\n"));
        assert!(out.contains("- Translated language: RUSSIAN (ru)\n- Romanization: iso_9"));
        assert!(out.ends_with("[00:01:01.250] спасибо\n_spasibo_\n"));
    }

    #[test]
    fn multi_language_is_block_quoted() {
        let cfg = MarkdownCfg::default();
        let out = MarkdownEncoder::new(&cfg).encode(
            &track(TrackKind::Translated(Language::Russian), RomanizationMethod::Iso9),
            SubtitleVariant::MultiLanguage,
        );
        assert!(out.ends_with("[00:01:01.250]\n> thank you\n> спасибо\n> _spasibo_\n"));
    }
}
