//! Three-tier translation: full text, then segments, then word alignment.

pub mod dispatch;
pub mod matching;
pub mod orchestrator;
pub mod prompts;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;

pub use dispatch::{Dispatcher, TaskOutcome, TaskUnit};
pub use orchestrator::Orchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    FullText,
    Segment,
    WordAlignment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::FullText => "full-text",
            Stage::Segment => "segment",
            Stage::WordAlignment => "word-alignment",
        })
    }
}

/// Where a full-text result belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageAddress {
    pub language: Language,
}

impl fmt::Display for LanguageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language.iso_code())
    }
}

/// Where a segment-level result belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentAddress {
    pub language: Language,
    pub segment_index: usize,
}

impl fmt::Display for SegmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/segment {}",
            self.language.iso_code(),
            self.segment_index
        )
    }
}
