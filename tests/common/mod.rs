//! Shared fixtures: transcripts and a scripted in-process LLM.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};

use subtrans::{
    error::LlmError,
    language::{Language, LanguageDescriptor, LanguageRegistry},
    llm::{ResponseSchema, StructuredRequester},
    model::Transcript,
    source::{RawSegment, RawTranscription, RawWord},
};

pub type Responder = dyn Fn(&str, &ResponseSchema) -> Result<Value, LlmError> + Send + Sync;
pub type Delay = dyn Fn(&str) -> u64 + Send + Sync;

/// Fake requester that records every call and answers through a closure.
pub struct ScriptedRequester {
    calls: Mutex<Vec<(String, &'static str)>>,
    respond: Box<Responder>,
    delay_ms: Box<Delay>,
}

impl ScriptedRequester {
    pub fn new(
        respond: impl Fn(&str, &ResponseSchema) -> Result<Value, LlmError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::with_delay(respond, |_| 0)
    }

    pub fn with_delay(
        respond: impl Fn(&str, &ResponseSchema) -> Result<Value, LlmError> + Send + Sync + 'static,
        delay_ms: impl Fn(&str) -> u64 + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay_ms: Box::new(delay_ms),
        })
    }

    /// Fake that translates by reversing word order and uppercasing, and
    /// aligns each original word to its uppercased form.
    pub fn mirror() -> Arc<Self> {
        Self::new(mirror_response)
    }

    pub fn calls_for(&self, schema: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == schema)
            .count()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

#[async_trait]
impl StructuredRequester for ScriptedRequester {
    async fn request(
        &self,
        system_prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), schema.name));
        let delay = (self.delay_ms)(system_prompt);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        (self.respond)(system_prompt, schema)
    }
}

/// Text following the last occurrence of `marker`, up to the end of the prompt.
pub fn after<'a>(prompt: &'a str, marker: &str) -> &'a str {
    prompt
        .rfind(marker)
        .map(|i| prompt[i + marker.len()..].trim())
        .unwrap_or("")
}

/// `(index, text)` pairs listed under `heading` until the next blank line.
pub fn indexed_lines(prompt: &str, heading: &str) -> Vec<(usize, String)> {
    let Some(start) = prompt.find(heading) else {
        return Vec::new();
    };
    prompt[start + heading.len()..]
        .lines()
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| {
            let (i, rest) = l.split_once(": ")?;
            let text = rest.split(" [").next()?.split(" (").next()?.trim();
            Some((i.trim().parse().ok()?, text.to_string()))
        })
        .collect()
}

pub fn mirror_text(text: &str) -> String {
    text.split_whitespace()
        .rev()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn mirror_response(prompt: &str, schema: &ResponseSchema) -> Result<Value, LlmError> {
    match schema.name {
        "translated_text" => {
            let source = if prompt.contains("Section text:\n") {
                after(prompt, "Section text:\n")
            } else {
                after(prompt, "Transcript:\n")
            };
            let translated = mirror_text(source);
            let romanized = prompt
                .contains("Also provide romanized_text")
                .then(|| translated.to_lowercase());
            Ok(json!({ "translated_text": translated, "romanized_text": romanized }))
        }
        "matched_segment" => {
            let matched: Vec<Value> = indexed_lines(prompt, "Original words:\n")
                .into_iter()
                .map(|(i, text)| {
                    let upper = text.to_uppercase();
                    json!({
                        "original_word_index": i,
                        "original_word_text": text,
                        "translated_word_index": 0,
                        "translated_word_text": upper,
                        "translated_word_romanized_text": upper.to_lowercase(),
                    })
                })
                .collect();
            Ok(json!({ "matched_words": matched }))
        }
        other => Err(LlmError::Schema {
            schema: other.to_string(),
            message: "unexpected schema".to_string(),
        }),
    }
}

pub fn raw_word(text: &str, start: f64, end: f64) -> RawWord {
    RawWord {
        text: text.to_string(),
        start,
        end,
    }
}

pub fn raw_segment(start: f64, end: f64, words: &[(&str, f64, f64)]) -> RawSegment {
    RawSegment {
        start,
        end,
        text: words.iter().map(|w| w.0).collect::<Vec<_>>().join(" "),
        words: words.iter().map(|w| raw_word(w.0, w.1, w.2)).collect(),
    }
}

/// Three segments: a repeated-word line, a plain line and a wordless one.
pub fn sample_raw() -> RawTranscription {
    RawTranscription {
        text: "you and you hello world".to_string(),
        language: "english".to_string(),
        segments: vec![
            raw_segment(
                0.0,
                1.0,
                &[("you", 0.0, 0.3), ("and", 0.35, 0.6), ("you", 0.65, 1.0)],
            ),
            raw_segment(2.0, 3.0, &[("hello", 2.0, 2.4), ("world", 2.5, 3.0)]),
            raw_segment(3.0, 4.0, &[]),
        ],
    }
}

/// `count` one-second segments with two words each.
pub fn numbered_raw(count: usize) -> RawTranscription {
    let segments = (0..count)
        .map(|i| {
            let s = i as f64;
            raw_segment(s, s + 1.0, &[("word", s, s + 0.4), ("number", s + 0.5, s + 0.9)])
        })
        .collect();
    RawTranscription {
        text: String::new(),
        language: "english".to_string(),
        segments,
    }
}

pub fn descriptors(languages: &[Language]) -> Vec<LanguageDescriptor> {
    let registry = LanguageRegistry::builtin();
    languages
        .iter()
        .map(|l| registry.get(*l).unwrap().clone())
        .collect()
}

pub fn pending_transcript(raw: RawTranscription, languages: &[Language]) -> Transcript {
    Transcript::from_raw(raw, &descriptors(languages)).unwrap()
}
