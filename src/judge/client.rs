use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::models::JudgeEntry;
use crate::config::JudgeConfig;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("judge returned status {0}")]
    Status(u16),

    #[error("judge timed out")]
    Timeout,

    #[error("malformed judge response: {0}")]
    MalformedResponse(String),

    #[error("judge returned no text")]
    EmptyResponse,
}

/// External capability that reviews a round's drawings and names a winner.
///
/// Implementations return the provider's free text; parsing it is the
/// caller's job.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, entries: &[JudgeEntry]) -> Result<String, JudgeError>;
}

/// Judge backed by the Gemini `generateContent` HTTP API
pub struct GeminiJudge {
    client: reqwest::Client,
    config: JudgeConfig,
}

impl GeminiJudge {
    pub fn new(config: JudgeConfig) -> Self {
        if config.api_key.is_none() {
            warn!("No judge API key configured, judgments will fall back to placeholders");
        }
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Judge for GeminiJudge {
    #[instrument(skip(self, entries), fields(entry_count = entries.len()))]
    async fn judge(&self, entries: &[JudgeEntry]) -> Result<String, JudgeError> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": build_prompt(entries) } ] }
            ]
        });

        let mut request = self
            .client
            .post(&self.config.api_url)
            .timeout(self.config.request_timeout)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                JudgeError::Timeout
            } else {
                JudgeError::Transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| JudgeError::MalformedResponse(e.to_string()))?;
        let text = extract_text(&payload)?;
        debug!(text_len = text.len(), "Judge responded");
        Ok(text)
    }
}

/// Prompt sent to the judge. Images are not forwarded, only names and topics.
pub(crate) fn build_prompt(entries: &[JudgeEntry]) -> String {
    let mut prompt = String::from(
        "You are a funny and witty art judge for a drawing game. \
         Below are the final submissions. For each, give a brief, humorous description of the drawing \
         and then pick a winner in a funny tone. \
         Format your answer as:\n\
         Descriptions:\n\
         - {drawer_name}: {description}\n\
         ... (repeat for each)\n\
         Winner: {drawer_name}\n\
         Reason: {funny_reason}\n\
         Here are the submissions:\n",
    );
    for (i, entry) in entries.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} drew '{}'. (Image is base64 PNG, not shown here)\n",
            i + 1,
            entry.drawer_name,
            entry.topic
        ));
    }
    prompt
}

/// Pulls the generated text out of a response.
///
/// Streaming responses arrive as an array of chunks whose text parts are
/// concatenated; a plain object contributes its first candidate's first part.
pub(crate) fn extract_text(payload: &Value) -> Result<String, JudgeError> {
    let text = match payload {
        Value::Array(chunks) => chunks
            .iter()
            .filter_map(|chunk| chunk.get("candidates").and_then(Value::as_array))
            .flatten()
            .filter_map(|candidate| candidate.pointer("/content/parts").and_then(Value::as_array))
            .flatten()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<String>(),
        Value::Object(_) => payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                JudgeError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
            })?,
        other => {
            return Err(JudgeError::MalformedResponse(format!(
                "unexpected JSON type: {}",
                json_type(other)
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(JudgeError::EmptyResponse);
    }
    Ok(text)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, topic: &str) -> JudgeEntry {
        JudgeEntry {
            drawer_id: format!("id-{}", name),
            drawer_name: name.to_string(),
            topic: topic.to_string(),
            image_b64: "aGVsbG8=".to_string(),
        }
    }

    #[test]
    fn test_prompt_lists_each_submission() {
        let prompt = build_prompt(&[entry("Alice", "Robot"), entry("Bob", "Robot")]);

        assert!(prompt.contains("Descriptions:"));
        assert!(prompt.contains("1. Alice drew 'Robot'."));
        assert!(prompt.contains("2. Bob drew 'Robot'."));
        assert!(!prompt.contains("aGVsbG8="));
    }

    #[test]
    fn test_extract_text_from_streamed_chunks() {
        let payload = json!([
            { "candidates": [ { "content": { "parts": [ { "text": "Descriptions:\n- Al" } ] } } ] },
            { "candidates": [ { "content": { "parts": [ { "text": "ice: neat\nWinner: Alice" } ] } } ] },
            { "usageMetadata": { "totalTokenCount": 12 } }
        ]);

        let text = extract_text(&payload).unwrap();

        assert_eq!(text, "Descriptions:\n- Alice: neat\nWinner: Alice");
    }

    #[test]
    fn test_extract_text_from_single_object() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Winner: Bob" }, { "text": "ignored" } ] } },
                { "content": { "parts": [ { "text": "second candidate" } ] } }
            ]
        });

        assert_eq!(extract_text(&payload).unwrap(), "Winner: Bob");
    }

    #[test]
    fn test_extract_text_object_without_candidates_is_malformed() {
        let payload = json!({ "error": { "message": "quota" } });

        assert!(matches!(
            extract_text(&payload),
            Err(JudgeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_text_unexpected_type_is_malformed() {
        assert!(matches!(
            extract_text(&json!("just a string")),
            Err(JudgeError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_text_empty_stream() {
        assert!(matches!(
            extract_text(&json!([])),
            Err(JudgeError::EmptyResponse)
        ));
    }
}
