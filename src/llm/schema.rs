//! Response contracts for the three translation stages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::LlmError;

/// A named JSON schema handed to the requester along with the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub schema: Value,
}

impl ResponseSchema {
    pub fn of<T: JsonSchema>(name: &'static str) -> Self {
        Self {
            name,
            schema: schemars::schema_for!(T).to_value(),
        }
    }

    /// Decodes a response value into the contract type, mapping any shape
    /// mismatch to [`LlmError::Schema`].
    pub fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, LlmError> {
        serde_json::from_value(value).map_err(|e| LlmError::Schema {
            schema: self.name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Output of the full-text and segment stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranslatedTextResponse {
    /// The translation in the target language's script.
    pub translated_text: String,
    /// Romanized form of the translation, absent when the method is NONE.
    #[serde(default)]
    pub romanized_text: Option<String>,
}

/// One original word and the translated word chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordMatchResponse {
    pub original_word_index: usize,
    pub original_word_text: String,
    /// May fall outside the translated word list; clamped on application.
    pub translated_word_index: i64,
    pub translated_word_text: String,
    #[serde(default)]
    pub translated_word_romanized_text: Option<String>,
}

/// Output of the word-alignment stage for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchedSegmentResponse {
    pub matched_words: Vec<WordMatchResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_lists_contract_fields() {
        let schema = ResponseSchema::of::<TranslatedTextResponse>("translated_text");
        let props = &schema.schema["properties"];
        assert!(props.get("translated_text").is_some());
        assert!(props.get("romanized_text").is_some());
    }

    #[test]
    fn decode_reports_schema_name_on_mismatch() {
        let schema = ResponseSchema::of::<MatchedSegmentResponse>("matched_segment");
        let err = schema
            .decode::<MatchedSegmentResponse>(json!({"matched": []}))
            .unwrap_err();
        match err {
            LlmError::Schema { schema, .. } => assert_eq!(schema, "matched_segment"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_accepts_missing_romanization() {
        let schema = ResponseSchema::of::<TranslatedTextResponse>("translated_text");
        let r: TranslatedTextResponse = schema.decode(json!({"translated_text": "hola"})).unwrap();
        assert_eq!(r.romanized_text, None);
    }
}
