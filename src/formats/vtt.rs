use crate::{
    config::VttCfg,
    formats::{
        SubtitleCue, SubtitleEncoder, SubtitleTrack, SubtitleVariant,
        time::{format_vtt_timestamp, seconds_to_ms},
        wrap_lines,
    },
};

pub struct VttEncoder<'a> {
    cfg: &'a VttCfg,
}

impl<'a> VttEncoder<'a> {
    pub fn new(cfg: &'a VttCfg) -> Self {
        Self { cfg }
    }

    fn header(&self) -> Vec<String> {
        if !self.cfg.add_header {
            return Vec::new();
        }
        let mut lines = vec!["WEBVTT".to_string()];
        if let Some(d) = non_empty(&self.cfg.description) {
            lines.push(format!("NOTE {d}"));
        }
        if let Some(r) = non_empty(&self.cfg.region_settings) {
            lines.push(format!("REGION {r}"));
        }
        if let Some(v) = non_empty(&self.cfg.vertical_text) {
            lines.push(format!("STYLE::cue {{ vertical: {v} }}"));
        }
        lines
    }

    /// `line:` and `align:` cue settings, when positioning is enabled.
    fn cue_settings(&self) -> Option<String> {
        if !self.cfg.enable_positioning {
            return None;
        }
        let mut settings = Vec::new();
        if let Some(line) = non_empty(&self.cfg.line_position) {
            settings.push(format!("line:{line}"));
        }
        if !self.cfg.text_align.is_empty() {
            settings.push(format!("align:{}", self.cfg.text_align));
        }
        (!settings.is_empty()).then(|| settings.join(" "))
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Cue text with VTT markup: romanization in italics, multi-language
/// parts labelled.
fn cue_lines(track: &SubtitleTrack, cue: &SubtitleCue, variant: SubtitleVariant) -> Vec<String> {
    let translated = cue.translated_or_original().to_string();
    match variant {
        SubtitleVariant::OriginalSpoken => vec![cue.original.clone()],
        SubtitleVariant::TranslationOnly => vec![translated],
        SubtitleVariant::TranslationWithRomanization => {
            let mut lines = vec![translated];
            lines.extend(cue.romanized.as_ref().map(|r| format!("<i>{r}</i>")));
            lines
        }
        SubtitleVariant::MultiLanguage => {
            let mut lines = vec![
                format!("【Original】{}", cue.original),
                format!("【Translated】{translated}"),
            ];
            if track.has_romanization() {
                lines.extend(
                    cue.romanized
                        .as_ref()
                        .map(|r| format!("【Romanized】<i>{r}</i>")),
                );
            }
            lines
        }
    }
}

impl SubtitleEncoder for VttEncoder<'_> {
    fn encode(&self, track: &SubtitleTrack, variant: SubtitleVariant) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(track.cues.len() + 1);
        let header = self.header();
        if !header.is_empty() {
            blocks.push(header.join("\n"));
        }

        let settings = self.cue_settings();
        for (i, cue) in track.cues.iter().enumerate() {
            let mut timecode = format!(
                "{} --> {}",
                format_vtt_timestamp(seconds_to_ms(cue.start)),
                format_vtt_timestamp(seconds_to_ms(cue.end))
            );
            if let Some(s) = &settings {
                timecode.push(' ');
                timecode.push_str(s);
            }
            let text = wrap_lines(&cue_lines(track, cue, variant), self.cfg.wrap_limit);
            blocks.push(format!("{}\n{}\n{}", i + 1, timecode, text.join("\n")));
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
        formats::TrackKind,
        language::{Language, RomanizationMethod},
    };

    fn track() -> SubtitleTrack {
        SubtitleTrack {
            kind: TrackKind::Translated(Language::Japanese),
            original_language: "english".to_string(),
            romanization: RomanizationMethod::Hepburn,
            cues: vec![SubtitleCue {
                start: 0.0,
                end: 1.5,
                original: "good morning".to_string(),
                translated: Some("おはよう".to_string()),
                romanized: Some("ohayō".to_string()),
            }],
        }
    }

    #[test]
    fn default_output_has_header_and_note() {
        let cfg = VttCfg::default();
        let out = VttEncoder::new(&cfg).encode(&track(), SubtitleVariant::TranslationOnly);
        assert_eq!(
            out,
            "WEBVTT\nNOTE subtrans generated captions\n\n1\n00:00:00.000 --> 00:00:01.500\nおはよう\n"
        );
    }

    #[test]
    fn multi_language_cue_is_labelled() {
        let cfg = VttCfg {
            add_header: false,
            ..VttCfg::default()
        };
        let out = VttEncoder::new(&cfg).encode(&track(), SubtitleVariant::MultiLanguage);
        assert_eq!(
            out,
            "1\n00:00:00.000 --> 00:00:01.500\n【Original】good morning\n【Translated】おはよう\n【Romanized】<i>ohayō</i>\n"
        );
    }

    #[test]
    fn romanized_variant_uses_italics() {
        let cfg = VttCfg::default();
        let out = VttEncoder::new(&cfg).encode(&track(), SubtitleVariant::TranslationWithRomanization);
        assert!(out.ends_with("おはよう\n<i>ohayō</i>\n"));
    }

    #[test]
    fn positioning_and_styling_settings() {
        let cfg = VttCfg {
            description: None,
            region_settings: Some("id:bottom width:40%".to_string()),
            vertical_text: Some("rl".to_string()),
            enable_positioning: true,
            line_position: Some("90%".to_string()),
            text_align: "start".to_string(),
            wrap_limit: Some(8),
            ..VttCfg::default()
        };
        let out = VttEncoder::new(&cfg).encode(&track(), SubtitleVariant::OriginalSpoken);
        assert_eq!(
            out,
            "WEBVTT\nREGION id:bottom width:40%\nSTYLE::cue { vertical: rl }\n\n1\n00:00:00.000 --> 00:00:01.500 line:90% align:start\ngood\nmorning\n"
        );
    }
}
