//! Error types for the translation and subtitle pipeline.
//!
//! Library layers return these typed errors; the binary wraps them in
//! `anyhow` with context at the command boundary.

use thiserror::Error;

use crate::{language::Language, translate::Stage};

/// Data-integrity failures while building the transcript model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("transcript has no segments")]
    NoSegments,

    #[error("segment {index}: start {start:.3}s is negative")]
    NegativeStart { index: usize, start: f64 },

    #[error("segment {index}: end {end:.3}s is not after start {start:.3}s")]
    SegmentTiming { index: usize, start: f64, end: f64 },

    #[error("segment {index}: duration {duration:.3}s does not match {start:.3}s..{end:.3}s")]
    DurationMismatch {
        index: usize,
        start: f64,
        end: f64,
        duration: f64,
    },

    #[error("segment {segment}, word {word}: end {end:.3}s precedes start {start:.3}s")]
    WordTiming {
        segment: usize,
        word: usize,
        start: f64,
        end: f64,
    },

    #[error(
        "segment {segment}, word {word}: start {start:.3}s precedes previous word start {previous:.3}s"
    )]
    WordOrder {
        segment: usize,
        word: usize,
        start: f64,
        previous: f64,
    },

    #[error("segment {segment}, word {word}: index does not match its position")]
    WordIndex { segment: usize, word: usize },

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("unknown romanization method '{0}'")]
    UnknownRomanization(String),
}

/// Failures of the structured LLM request capability.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response carried no message content")]
    EmptyResponse,

    #[error("response does not match schema '{schema}': {message}")]
    Schema { schema: String, message: String },

    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Stage-level failures of the translation orchestrator.
///
/// Every variant names the stage; dispatch failures also carry the
/// address of the unit that failed and the original cause.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage failed for {address}")]
    Dispatch {
        stage: Stage,
        address: String,
        #[source]
        source: LlmError,
    },

    #[error("{stage} stage cannot start for {address}: {reason}")]
    Precondition {
        stage: Stage,
        address: String,
        reason: String,
    },

    #[error("{stage} stage settled {actual} of {expected} units")]
    Incomplete {
        stage: Stage,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} stage produced more than one result for {address}")]
    DuplicateAddress { stage: Stage, address: String },
}

/// Input checks performed before any subtitle text is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubtitleError {
    #[error("no segments to render")]
    Empty,

    #[error("segment {index}: end {end:.3}s is not after start {start:.3}s")]
    InvalidTiming { index: usize, start: f64, end: f64 },

    #[error("segment {index}: start {start:.3}s overlaps previous segment ending at {previous_end:.3}s")]
    Overlap {
        index: usize,
        start: f64,
        previous_end: f64,
    },

    #[error("{language} translation is still pending{}", segment_suffix(.segment))]
    Pending {
        language: Language,
        segment: Option<usize>,
    },
}

fn segment_suffix(segment: &Option<usize>) -> String {
    match segment {
        Some(i) => format!(" for segment {i}"),
        None => String::new(),
    }
}

/// Failures while reading a transcription-engine result.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized transcription shape: {0}")]
    Shape(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
