//! Structured LLM request capability.
//!
//! The translation stages only ever see [`StructuredRequester`]; the HTTP
//! client in [`openai`] is one implementation and tests plug in fakes.

pub mod openai;
pub mod schema;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;

pub use openai::OpenAiClient;
pub use schema::{
    MatchedSegmentResponse, ResponseSchema, TranslatedTextResponse, WordMatchResponse,
};

/// Sends one system prompt and returns a JSON value that is expected to
/// match `schema`. Retries and timeouts belong to the implementation.
#[async_trait]
pub trait StructuredRequester: Send + Sync {
    async fn request(&self, system_prompt: &str, schema: &ResponseSchema)
    -> Result<Value, LlmError>;
}
