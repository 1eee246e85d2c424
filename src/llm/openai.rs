//! OpenAI-compatible chat-completions client with JSON-schema output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::LlmCfg,
    error::LlmError,
    llm::{ResponseSchema, StructuredRequester},
};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature,
        }
    }

    /// Builds a client from the `[llm]` config section, reading the API key
    /// from the environment variable it names.
    pub fn from_config(cfg: &LlmCfg) -> Result<Self, LlmError> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(cfg.api_key_env.clone()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self::new(
            http,
            &cfg.base_url,
            &cfg.model,
            api_key,
            cfg.temperature,
        ))
    }

    fn request_body(&self, system_prompt: &str, schema: &ResponseSchema) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": system_prompt}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": false
                }
            }
        })
    }
}

#[async_trait]
impl StructuredRequester for OpenAiClient {
    async fn request(
        &self,
        system_prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(schema = schema.name, prompt_chars = system_prompt.len(), "sending request");

        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(system_prompt, schema))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let body: Value = resp.json().await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        serde_json::from_str(content).map_err(|e| LlmError::Schema {
            schema: schema.name.to_string(),
            message: format!("content is not JSON: {e}"),
        })
    }
}
