use crate::{
    config::SrtCfg,
    formats::{
        SubtitleEncoder, SubtitleTrack, SubtitleVariant,
        time::{format_srt_timestamp, seconds_to_ms},
        wrap_lines,
    },
};

/// Start used instead of an exact zero; some players drop a cue at 0.
const ZERO_START_NUDGE_MS: i64 = 10;

pub struct SrtEncoder<'a> {
    cfg: &'a SrtCfg,
}

impl<'a> SrtEncoder<'a> {
    pub fn new(cfg: &'a SrtCfg) -> Self {
        Self { cfg }
    }

    /// A cue too short to hold the nudge keeps its zero start.
    fn start_ms(&self, start: f64, end_ms: i64) -> i64 {
        let ms = seconds_to_ms(start);
        if self.cfg.nudge_zero_start && ms == 0 && end_ms > ZERO_START_NUDGE_MS {
            ZERO_START_NUDGE_MS
        } else {
            ms
        }
    }
}

impl SubtitleEncoder for SrtEncoder<'_> {
    fn encode(&self, track: &SubtitleTrack, variant: SubtitleVariant) -> String {
        let mut out = String::new();

        for (i, cue) in track.cues.iter().enumerate() {
            out.push_str(&(i + 1).to_string());
            out.push('\n');

            let end_ms = seconds_to_ms(cue.end);
            out.push_str(&format!(
                "{} --> {}\n",
                format_srt_timestamp(self.start_ms(cue.start, end_ms)),
                format_srt_timestamp(end_ms)
            ));

            for line in wrap_lines(&track.lines(cue, variant), self.cfg.wrap_width) {
                out.push_str(&line);
                out.push('\n');
            }

            out.push('\n');
        }

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
            cues: vec![
                SubtitleCue {
                    start: 0.0,
                    end: 1.0,
                    original: "hi".to_string(),
                    translated: Some("你好".to_string()),
                    romanized: Some("nǐ hǎo".to_string()),
                },
                SubtitleCue {
                    start: 1.5,
                    end: 2.25,
                    original: "bye".to_string(),
                    translated: Some("再见".to_string()),
                    romanized: Some("zài jiàn".to_string()),
                },
            ],
        }
    }

    #[test]
    fn zero_start_is_nudged() {
        let cfg = SrtCfg::default();
        let out = SrtEncoder::new(&cfg).encode(
            &track(TrackKind::Original, RomanizationMethod::None),
            SubtitleVariant::OriginalSpoken,
        );
        assert_eq!(
            out,
            "1\n00:00:00,010 --> 00:00:01,000\nhi\n\n2\n00:00:01,500 --> 00:00:02,250\nbye\n\n"
        );
    }

    #[test]
    fn nudge_can_be_disabled() {
        let cfg = SrtCfg {
            nudge_zero_start: false,
            ..SrtCfg::default()
        };
        let out = SrtEncoder::new(&cfg).encode(
            &track(TrackKind::Original, RomanizationMethod::None),
            SubtitleVariant::OriginalSpoken,
        );
        assert!(out.starts_with("1\n00:00:00,000 --> "));
    }

    #[test]
    fn cue_shorter_than_nudge_keeps_zero_start() {
        let cfg = SrtCfg::default();
        let mut t = track(TrackKind::Original, RomanizationMethod::None);
        t.cues[0].end = 0.005;
        let out = SrtEncoder::new(&cfg).encode(&t, SubtitleVariant::OriginalSpoken);
        assert!(out.starts_with("1\n00:00:00,000 --> 00:00:00,005\nhi\n"));
    }

    #[test]
    fn multi_language_stacks_all_lines() {
        let cfg = SrtCfg::default();
        let out = SrtEncoder::new(&cfg).encode(
            &track(
                TrackKind::Translated(Language::ChineseMandarinSimplified),
                RomanizationMethod::Pinyin,
            ),
            SubtitleVariant::MultiLanguage,
        );
        assert!(out.contains("00:00:01,500 --> 00:00:02,250\nbye\n再见\nzài jiàn\n\n"));
    }
}
