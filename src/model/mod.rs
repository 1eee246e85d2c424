//! Transcript model: words, segments, per-language translation slots and
//! word alignments.
//!
//! A [`Transcript`] is built once from a transcription result with every
//! translation pending. The orchestrator fills translation and alignment
//! payloads; nothing ever adds, removes or reorders segments or words.

pub mod alignment;
pub mod segment;
pub mod transcript;
pub mod translation;
pub mod word;

pub use alignment::{MatchedSegment, MatchedWord};
pub use segment::Segment;
pub use transcript::Transcript;
pub use translation::{NOT_YET_TRANSLATED, TranslatedText, Translation};
pub use word::Word;

/// Tolerance used when comparing a stored duration with `end - start`.
pub const DURATION_TOLERANCE: f64 = 0.001;
