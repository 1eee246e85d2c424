//! System prompts for the three translation stages.

use std::fmt::Write as _;

use crate::{
    language::LanguageDescriptor,
    model::{Segment, TranslatedText},
};

/// Position marker embedded in segment prompts, 1-based.
pub fn segment_position(index: usize, total: usize) -> String {
    format!("Section# {} of {}", index + 1, total)
}

fn romanization_rule(target: &LanguageDescriptor) -> String {
    if target.romanization.is_none() {
        "Leave romanized_text empty.".to_string()
    } else {
        format!(
            "Also provide romanized_text using this method: {}",
            target.romanization.instructions()
        )
    }
}

pub fn full_text_prompt(
    original_language: &str,
    text: &str,
    target: &LanguageDescriptor,
) -> String {
    let mut p = String::new();
    let _ = writeln!(
        p,
        "You are a professional translator. Translate the transcript below from {original_language} into {}.",
        target.name
    );
    p.push_str(
        "If the transcript is already in the target language, return it unchanged.\n\
         Keep the meaning and register of the speaker; do not summarize or add commentary.\n",
    );
    let _ = writeln!(p, "{}", romanization_rule(target));
    let _ = writeln!(p, "\nTarget language:\n{}", target.prompt_block());
    let _ = writeln!(p, "\nTranscript:\n{text}");
    p
}

pub fn segment_prompt(
    original_language: &str,
    full_text: &str,
    full_translation: &TranslatedText,
    segment: &Segment,
    index: usize,
    total: usize,
    target: &LanguageDescriptor,
) -> String {
    let mut p = String::new();
    let _ = writeln!(
        p,
        "You are a professional subtitle translator. Translate one section of a {original_language} transcript into {}.",
        target.name
    );
    p.push_str(
        "Use the full transcript and its full translation only as context; translate the section alone.\n",
    );
    let _ = writeln!(p, "{}", romanization_rule(target));
    let _ = writeln!(p, "\nTarget language:\n{}", target.prompt_block());
    let _ = writeln!(p, "\nFull transcript:\n{full_text}");
    let _ = writeln!(p, "\nFull translation:\n{}", full_translation.text);
    let _ = writeln!(p, "\n{}", segment_position(index, total));
    let _ = writeln!(
        p,
        "start: {:.3}s\nend: {:.3}s\nduration: {:.3}s",
        segment.start, segment.end, segment.duration
    );
    let _ = writeln!(p, "\nSection text:\n{}", segment.text);
    p
}

pub fn word_alignment_prompt(
    segment: &Segment,
    translation: &TranslatedText,
    translated_words: &[String],
    romanized_words: Option<&[String]>,
    target: &LanguageDescriptor,
) -> String {
    let mut p = String::new();
    let _ = writeln!(
        p,
        "Match every original word to the {} word that carries its meaning.",
        target.name
    );
    p.push_str(
        "Return exactly one entry per original word, in original order, using the indices below.\n\
         One translated word may serve several consecutive original words.\n\
         When an original word repeats, pick the translated occurrence closest to its position.\n\
         If nothing fits, use the last translated word.\n",
    );
    if !target.romanization.is_none() {
        let _ = writeln!(
            p,
            "Give the romanized form of each chosen word ({}).",
            target.romanization.id()
        );
    }

    let _ = writeln!(p, "\nOriginal text: {}", segment.text);
    p.push_str("Original words:\n");
    for w in &segment.words {
        let _ = writeln!(
            p,
            "{}: {} [{:.3}s - {:.3}s]",
            w.index_in_segment, w.text, w.start, w.end
        );
    }

    let _ = writeln!(p, "\nTranslated text: {}", translation.text);
    p.push_str("Translated words:\n");
    for (i, w) in translated_words.iter().enumerate() {
        match romanized_words.and_then(|r| r.get(i)) {
            Some(r) => {
                let _ = writeln!(p, "{i}: {w} ({r})");
            }
            None => {
                let _ = writeln!(p, "{i}: {w}");
            }
        }
    }
    p
}
