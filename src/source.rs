//! Reader for transcription-engine results.
//!
//! Accepts whisper-style verbose JSON: top-level `text` and `language`,
//! `segments[]` with `start`/`end`/`text` and optional per-segment
//! `words[]`, plus an optional flat `words[]` list. Times may be numbers
//! (seconds) or timestamp strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::SourceError, formats::time::parse_time_to_ms, language::LanguageDescriptor,
    model::Transcript,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Vec<RawWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTranscription {
    pub text: String,
    pub language: String,
    pub segments: Vec<RawSegment>,
}

pub fn parse_transcription(input: &str) -> Result<RawTranscription, SourceError> {
    let v: Value = serde_json::from_str(input)?;
    let obj = v
        .as_object()
        .ok_or_else(|| SourceError::Shape("top level must be an object".to_string()))?;

    let segs = obj
        .get("segments")
        .ok_or_else(|| SourceError::Shape("missing segments".to_string()))?
        .as_array()
        .ok_or_else(|| SourceError::Shape("segments must be an array".to_string()))?;

    let mut segments = Vec::with_capacity(segs.len());
    for (i, item) in segs.iter().enumerate() {
        let seg = item
            .as_object()
            .ok_or_else(|| SourceError::Shape(format!("segment {i} must be an object")))?;
        segments.push(parse_segment(i, seg)?);
    }

    if let Some(flat) = obj.get("words") {
        let words = parse_words(flat, "words")?;
        if segments.iter().all(|s| s.words.is_empty()) {
            debug!(words = words.len(), "distributing flat word list into segments");
            distribute_words(&mut segments, words);
        }
    }

    let language = obj
        .get("language")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string();

    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    Ok(RawTranscription {
        text,
        language,
        segments,
    })
}

/// Parses a transcription result and builds a pending [`Transcript`] for `targets`.
pub fn load_transcript(
    input: &str,
    targets: &[LanguageDescriptor],
) -> Result<Transcript, SourceError> {
    let raw = parse_transcription(input)?;
    Ok(Transcript::from_raw(raw, targets)?)
}

fn parse_segment(i: usize, obj: &Map<String, Value>) -> Result<RawSegment, SourceError> {
    let start = required_time(obj, "start", &format!("segment {i}"))?;
    let end = required_time(obj, "end", &format!("segment {i}"))?;
    let text = obj
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let words = match obj.get("words") {
        Some(Value::Null) | None => Vec::new(),
        Some(v) => parse_words(v, &format!("segment {i} words"))?,
    };
    Ok(RawSegment {
        start,
        end,
        text,
        words,
    })
}

fn parse_words(v: &Value, what: &str) -> Result<Vec<RawWord>, SourceError> {
    let arr = v
        .as_array()
        .ok_or_else(|| SourceError::Shape(format!("{what} must be an array")))?;
    let mut words = Vec::with_capacity(arr.len());
    for (j, item) in arr.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| SourceError::Shape(format!("{what}[{j}] must be an object")))?;
        let context = format!("{what}[{j}]");
        let text = obj
            .get("word")
            .or_else(|| obj.get("text"))
            .and_then(Value::as_str)
            .ok_or_else(|| SourceError::Shape(format!("{context}: missing word text")))?
            .to_string();
        words.push(RawWord {
            text,
            start: required_time(obj, "start", &context)?,
            end: required_time(obj, "end", &context)?,
        });
    }
    Ok(words)
}

fn required_time(obj: &Map<String, Value>, key: &str, context: &str) -> Result<f64, SourceError> {
    let v = obj
        .get(key)
        .ok_or_else(|| SourceError::Shape(format!("{context}: missing {key}")))?;
    decode_seconds(v).map_err(|e| SourceError::Shape(format!("{context}: {key}: {e}")))
}

fn decode_seconds(v: &Value) -> Result<f64, String> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| "bad numeric time".to_string()),
        Value::String(s) => {
            if let Ok(f) = s.trim().parse::<f64>() {
                return Ok(f);
            }
            parse_time_to_ms(s)
                .map(|ms| ms as f64 / 1000.0)
                .map_err(|e| e.to_string())
        }
        _ => Err("unsupported time type".to_string()),
    }
}

/// Assigns each word to the first segment that contains it, else to the
/// segment it overlaps most, else to the nearest one. No word is dropped.
fn distribute_words(segments: &mut [RawSegment], words: Vec<RawWord>) {
    if segments.is_empty() {
        return;
    }
    for word in words {
        let target = segments
            .iter()
            .position(|s| word.start >= s.start && word.end <= s.end)
            .or_else(|| best_overlap(segments, &word))
            .unwrap_or_else(|| nearest(segments, &word));
        segments[target].words.push(word);
    }
}

fn best_overlap(segments: &[RawSegment], word: &RawWord) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in segments.iter().enumerate() {
        let overlap = word.end.min(s.end) - word.start.max(s.start);
        if overlap > 0.0 && best.is_none_or(|(_, b)| overlap > b) {
            best = Some((i, overlap));
        }
    }
    best.map(|(i, _)| i)
}

fn nearest(segments: &[RawSegment], word: &RawWord) -> usize {
    let distance = |s: &RawSegment| {
        if word.end <= s.start {
            s.start - word.end
        } else {
            (word.start - s.end).max(0.0)
        }
    };
    let mut best = 0;
    for (i, s) in segments.iter().enumerate() {
        if distance(s) < distance(&segments[best]) {
            best = i;
        }
    }
    best
}
