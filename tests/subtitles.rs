mod common;

use std::{collections::BTreeSet, fs};

use subtrans::{
    config::Formats,
    error::SubtitleError,
    formats::{SubtitleFormat, SubtitleVariant, check_timing, synthesize},
    language::{Language, LanguageRegistry},
    model::Transcript,
    output,
    translate::Orchestrator,
};

use common::{ScriptedRequester, pending_transcript, raw_segment, sample_raw};

const ALL: [SubtitleFormat; 3] = [SubtitleFormat::Srt, SubtitleFormat::Vtt, SubtitleFormat::Md];

async fn translated(languages: &[Language]) -> Transcript {
    let orchestrator = Orchestrator::new(ScriptedRequester::mirror(), LanguageRegistry::builtin());
    orchestrator
        .run(pending_transcript(sample_raw(), languages))
        .await
        .unwrap()
}

#[test]
fn original_srt_nudges_zero_start() {
    let transcript = pending_transcript(sample_raw(), &[]);
    let artifacts = synthesize(&transcript, &[SubtitleFormat::Srt], &Formats::default()).unwrap();

    assert_eq!(artifacts.len(), 1);
    let srt = &artifacts[0];
    assert_eq!(srt.variant, SubtitleVariant::OriginalSpoken);
    assert!(
        srt.content
            .starts_with("1\n00:00:00,010 --> 00:00:01,000\nyou and you\n\n2\n00:00:02,000 --> 00:00:03,000\nhello world\n")
    );
}

#[test]
fn pending_translation_blocks_rendering() {
    let transcript = pending_transcript(sample_raw(), &[Language::French]);
    let err = synthesize(&transcript, &ALL, &Formats::default()).unwrap_err();
    assert_eq!(
        err,
        SubtitleError::Pending {
            language: Language::French,
            segment: Some(0),
        }
    );
}

fn sample_raw_with_overlap() -> subtrans::source::RawTranscription {
    let mut raw = sample_raw();
    raw.segments[1] = raw_segment(0.8, 3.0, &[("hello", 2.0, 2.4), ("world", 2.5, 3.0)]);
    raw
}

#[test]
fn overlapping_segments_are_rejected_before_encoding() {
    let raw = sample_raw_with_overlap();
    let transcript = pending_transcript(raw, &[Language::Spanish]);

    // Caught up front, while every translation is still pending.
    assert!(matches!(
        check_timing(&transcript),
        Err(SubtitleError::Overlap { index: 1, .. })
    ));

    let untranslated = pending_transcript(sample_raw_with_overlap(), &[]);
    let err = synthesize(&untranslated, &ALL, &Formats::default()).unwrap_err();
    assert!(matches!(err, SubtitleError::Overlap { index: 1, .. }));
}

#[tokio::test]
async fn romanized_variant_only_for_romanized_languages() {
    let done = translated(&[Language::Spanish, Language::Russian]).await;
    let artifacts = synthesize(&done, &[SubtitleFormat::Vtt], &Formats::default()).unwrap();

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
        variants_for("ru"),
        vec![
            SubtitleVariant::TranslationOnly,
            SubtitleVariant::TranslationWithRomanization,
            SubtitleVariant::MultiLanguage,
        ]
    );

    let ru_multi = artifacts
        .iter()
        .find(|a| a.track == "ru" && a.variant == SubtitleVariant::MultiLanguage)
        .unwrap();
    assert!(ru_multi.content.starts_with("WEBVTT"));
    assert!(ru_multi.content.contains("【Original】you and you"));
    assert!(ru_multi.content.contains("【Translated】YOU AND YOU"));
    assert!(ru_multi.content.contains("【Romanized】<i>you and you</i>"));

    let es_multi = artifacts
        .iter()
        .find(|a| a.track == "es" && a.variant == SubtitleVariant::MultiLanguage)
        .unwrap();
    assert!(!es_multi.content.contains("【Romanized】"));
}

#[tokio::test]
async fn writes_every_artifact_and_reads_the_transcript_back() {
    let done = translated(&[Language::Spanish, Language::Russian]).await;
    let dir = tempfile::tempdir().unwrap();

    let (out_dir, stem) = output::output_location("talk.json", Some(dir.path())).unwrap();
    let artifacts = synthesize(&done, &ALL, &Formats::default()).unwrap();
    let mut files = vec![output::transcript_file(&out_dir, &stem, &done).unwrap()];
    files.extend(output::subtitle_files(&out_dir, &stem, artifacts));
    output::write_all(&files, false).unwrap();

    let written: BTreeSet<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    // original: 1 variant, es: 2, ru: 3; in three formats, plus the JSON.
    assert_eq!(written.len(), 6 * 3 + 1);
    for name in [
        "talk_translation.json",
        "talk_original_original_spoken.srt",
        "talk_es_translation_only.vtt",
        "talk_ru_translation_with_romanization.md",
        "talk_ru_multi_language.srt",
    ] {
        assert!(written.contains(name), "missing {name}");
    }

    let raw = fs::read_to_string(dir.path().join("talk_translation.json")).unwrap();
    let back = output::parse_transcript_json(&raw).unwrap();
    assert_eq!(back, done);

    // A second run without overwrite refuses and leaves files alone.
    assert!(output::write_all(&files, false).is_err());
    output::write_all(&files, true).unwrap();
}

#[tokio::test]
async fn hand_edited_aligned_transcript_is_rejected_not_downgraded() {
    let done = translated(&[Language::Spanish]).await;
    let mut value: serde_json::Value =
        serde_json::from_str(&output::transcript_json(&done).unwrap()).unwrap();
    value["segments"][1]["start"] = serde_json::json!(2.1);

    let err = output::read_subtitle_input(&value.to_string()).unwrap_err();
    assert!(format!("{err:#}").contains("duration"));

    let intact = output::read_subtitle_input(&output::transcript_json(&done).unwrap()).unwrap();
    assert_eq!(intact, done);
}
