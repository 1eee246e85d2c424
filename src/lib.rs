//! Translation-alignment pipeline for timestamped speech transcripts.
//!
//! A transcription result is loaded into a [`model::Transcript`], translated
//! in three concurrent stages by [`translate::Orchestrator`], and rendered
//! into SRT, VTT and Markdown subtitles by [`formats::synthesize`].
//! [`resolve::resolve`] answers what is being said at any point in time.

pub mod config;
pub mod error;
pub mod formats;
pub mod language;
pub mod llm;
pub mod model;
pub mod output;
pub mod resolve;
pub mod source;
pub mod text;
pub mod translate;
