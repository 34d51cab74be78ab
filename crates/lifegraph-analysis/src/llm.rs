//! Generative-text backend abstraction and implementations.
//!
//! Defines an enum-based dispatch for text-generation backends, avoiding
//! the dyn-compatibility issues with async trait methods. Concrete
//! implementations exist for the Gemini `generateContent` API and for
//! `OpenAI`-compatible chat completions APIs. All backends communicate
//! over HTTP via `reqwest`.
//!
//! One call carries a model identifier and a prompt string and returns
//! generated text or an error. No retries, no streaming, no session
//! state: the call is atomic from the caller's perspective.

use crate::config::{AnalysisConfig, BackendType};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Unified backend enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// A generative-text backend that can turn a prompt into a response.
///
/// Uses enum dispatch instead of trait objects because async methods
/// are not dyn-compatible in Rust.
pub enum LlmBackend {
    /// Gemini `generateContent` API.
    Gemini(GeminiBackend),
    /// `OpenAI`-compatible chat completions API.
    OpenAi(OpenAiBackend),
}

/// Build the backend selected by the configuration.
pub fn create_backend(config: &AnalysisConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::Gemini => LlmBackend::Gemini(GeminiBackend::new(config)),
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
    }
}

impl LlmBackend {
    /// Send a prompt to the backend and return the response text.
    ///
    /// Dispatches to the concrete backend implementation.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Backend`] if the HTTP call fails or the
    /// response cannot be extracted.
    pub async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        match self {
            Self::Gemini(backend) => backend.complete(prompt).await,
            Self::OpenAi(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
        }
    }
}

// ---------------------------------------------------------------------------
// Gemini backend
// ---------------------------------------------------------------------------

/// Backend for the Gemini `generateContent` API.
///
/// Sends requests to `{api_url}/models/{model}:generateContent` with the
/// `x-goog-api-key` header. The response text lives at
/// `candidates[0].content.parts[0].text`.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let body = serde_json::json!({
            "contents": [
                {"parts": [{"text": prompt}]}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Backend(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(AnalysisError::Backend(format!(
                "Gemini returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Backend(format!("Gemini response parse failed: {e}")))?;

        extract_gemini_text(&json)
    }
}

/// Extract the text content from a Gemini `generateContent` response.
fn extract_gemini_text(json: &serde_json::Value) -> Result<String, AnalysisError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AnalysisError::Backend(
                "Gemini response missing candidates[0].content.parts[0].text".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// OpenAI-compatible backend
// ---------------------------------------------------------------------------

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Works with `OpenAI`, `DeepSeek`, and Ollama endpoints.
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.7
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Backend(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(AnalysisError::Backend(format!(
                "OpenAI returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Backend(format!("OpenAI response parse failed: {e}")))?;

        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, AnalysisError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            AnalysisError::Backend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gemini_text_extracts_from_valid_response() {
        let json = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "## 분석 결과\n따뜻한 이야기"}]}}
            ]
        });
        assert_eq!(
            extract_gemini_text(&json).unwrap(),
            "## 분석 결과\n따뜻한 이야기"
        );
    }

    #[test]
    fn gemini_extraction_fails_on_empty_candidates() {
        let json = serde_json::json!({"candidates": []});
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(matches!(err, AnalysisError::Backend(_)));
    }

    #[test]
    fn openai_content_extracts_from_valid_response() {
        let json = serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "분석 텍스트"}}
            ]
        });
        assert_eq!(extract_openai_content(&json).unwrap(), "분석 텍스트");
    }

    #[test]
    fn openai_extraction_fails_on_missing_message() {
        let json = serde_json::json!({"choices": [{}]});
        assert!(extract_openai_content(&json).is_err());
    }
}
