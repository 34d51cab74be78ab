//! Configuration for the analysis client.
//!
//! All configuration is loaded from environment variables: which backend
//! to talk to, its base URL, the API key, and the model identifier.
//! Credentials are process-level configuration; the core never persists
//! or manages them beyond reading the environment.

use crate::error::AnalysisError;

/// Default Gemini API base URL.
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Supported generative-text backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Google Gemini `generateContent` API.
    Gemini,
    /// `OpenAI`-compatible chat completions API (works with `OpenAI`,
    /// `DeepSeek`, and Ollama endpoints).
    OpenAi,
}

/// Complete analysis client configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-flash`).
    pub model: String,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `LIFEGRAPH_LLM_API_KEY` -- API key for the backend
    ///
    /// Optional variables:
    /// - `LIFEGRAPH_LLM_BACKEND` -- `gemini` (default) or `openai`
    /// - `LIFEGRAPH_LLM_API_URL` -- base API URL (default: the public
    ///   Gemini endpoint)
    /// - `LIFEGRAPH_LLM_MODEL` -- model identifier (default
    ///   `gemini-2.5-flash`)
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if the API key is missing or the
    /// backend type is unknown.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let api_key = std::env::var("LIFEGRAPH_LLM_API_KEY").map_err(|_| {
            AnalysisError::Config("LIFEGRAPH_LLM_API_KEY is not set".to_owned())
        })?;

        let backend_type = match std::env::var("LIFEGRAPH_LLM_BACKEND")
            .unwrap_or_else(|_| "gemini".to_owned())
            .to_lowercase()
            .as_str()
        {
            "gemini" => BackendType::Gemini,
            "openai" => BackendType::OpenAi,
            other => {
                return Err(AnalysisError::Config(format!(
                    "unknown LIFEGRAPH_LLM_BACKEND: {other}"
                )));
            }
        };

        let api_url = std::env::var("LIFEGRAPH_LLM_API_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_owned());

        let model =
            std::env::var("LIFEGRAPH_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

        Ok(Self {
            backend_type,
            api_url,
            api_key,
            model,
        })
    }
}
