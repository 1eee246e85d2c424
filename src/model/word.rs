use serde::{Deserialize, Serialize};

/// One spoken word in the original language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub index_in_segment: usize,
    pub index_in_transcript: usize,
}

impl Word {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}
