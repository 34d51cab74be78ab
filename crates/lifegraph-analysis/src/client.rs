//! The analysis client: one prompt, one call, one narrative.
//!
//! Orchestrates the full analysis cycle:
//! 1. Check the minimum-event precondition (never reaches the backend)
//! 2. Render the fixed life-coach prompt from the event snapshot
//! 3. Issue exactly one request to the configured backend
//! 4. Return the response text verbatim, or a classified failure
//!
//! The client is stateless and reentrant-safe. Keeping at most one
//! analysis in flight per session is the presentation shell's policy,
//! not a lock here.

use std::time::Instant;

use lifegraph_types::LifeEvent;
use tracing::{error, info};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::llm::{LlmBackend, create_backend};
use crate::prompt::PromptEngine;

/// Minimum number of events required before analysis is meaningful.
pub const MIN_EVENTS_FOR_ANALYSIS: usize = 3;

/// Client producing a narrative analysis of a life timeline.
pub struct AnalysisClient {
    backend: LlmBackend,
    prompt_engine: PromptEngine,
}

impl AnalysisClient {
    /// Create a client for the backend selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Template`] if the prompt template fails
    /// to load.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            backend: create_backend(config),
            prompt_engine: PromptEngine::new()?,
        })
    }

    /// Create a client around an already-built backend (used by tests).
    pub fn with_backend(backend: LlmBackend) -> Result<Self, AnalysisError> {
        Ok(Self {
            backend,
            prompt_engine: PromptEngine::new()?,
        })
    }

    /// Produce a narrative analysis of the given event snapshot.
    ///
    /// Returns the backend's text verbatim on success. Atomic from the
    /// caller's perspective: it either fully succeeds or fully fails,
    /// with no partial results.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NotEnoughEvents`] synchronously when fewer than
    ///   [`MIN_EVENTS_FOR_ANALYSIS`] events are supplied; no request is
    ///   made.
    /// - [`AnalysisError::Backend`] when the external call fails for any
    ///   reason (network, quota, malformed response). The full cause is
    ///   logged here; callers present [`AnalysisError::user_message`].
    pub async fn analyze(&self, events: &[LifeEvent]) -> Result<String, AnalysisError> {
        if events.len() < MIN_EVENTS_FOR_ANALYSIS {
            return Err(AnalysisError::NotEnoughEvents {
                provided: events.len(),
            });
        }

        let prompt = self.prompt_engine.render(events)?;
        let started = Instant::now();

        match self.backend.complete(&prompt).await {
            Ok(text) => {
                info!(
                    backend = self.backend.name(),
                    event_count = events.len(),
                    latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    response_chars = text.chars().count(),
                    "analysis completed"
                );
                Ok(text)
            }
            Err(e) => {
                // Full detail stays in the log; the user sees only the
                // stable message.
                error!(backend = self.backend.name(), cause = %e, "analysis failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lifegraph_types::LifeEventId;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::BackendType;

    fn event(age: u8, happiness: u8, description: &str) -> LifeEvent {
        LifeEvent {
            id: LifeEventId::new(),
            age,
            happiness,
            description: description.to_owned(),
            image: None,
            created_at: Utc::now(),
        }
    }

    fn three_events() -> Vec<LifeEvent> {
        vec![
            event(7, 8, "초등학교 입학"),
            event(9, 9, "자전거 타기 성공"),
            event(10, 5, "햄스터와 이별"),
        ]
    }

    fn gemini_config(api_url: String) -> AnalysisConfig {
        AnalysisConfig {
            backend_type: BackendType::Gemini,
            api_url,
            api_key: "test-key".to_owned(),
            model: "gemini-2.5-flash".to_owned(),
        }
    }

    #[tokio::test]
    async fn too_few_events_never_contact_the_backend() {
        let server = MockServer::start().await;
        // Any request reaching the server would violate the precondition
        // contract.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&gemini_config(server.uri())).unwrap();
        let events = vec![event(7, 8, "하나"), event(9, 9, "둘")];

        let err = client.analyze(&events).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NotEnoughEvents { provided: 2 }
        ));
        assert_eq!(
            err.user_message(),
            "분석을 위해 최소 3개 이상의 인생 이벤트를 입력해주세요."
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn successful_analysis_returns_backend_text_verbatim() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "## 인생 분석\n**행복의 절정**이 보입니다."}]}}
            ]
        });
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&gemini_config(server.uri())).unwrap();
        let text = client.analyze(&three_events()).await.unwrap();
        assert_eq!(text, "## 인생 분석\n**행복의 절정**이 보입니다.");
        server.verify().await;
    }

    #[tokio::test]
    async fn backend_failure_classifies_with_a_stable_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&gemini_config(server.uri())).unwrap();
        let err = client.analyze(&three_events()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Backend(_)));
        assert!(err.to_string().contains("429"));
        assert_eq!(
            err.user_message(),
            "AI 분석에 실패했습니다. 잠시 후 다시 시도해주세요."
        );
    }

    #[tokio::test]
    async fn malformed_response_is_a_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&gemini_config(server.uri())).unwrap();
        let err = client.analyze(&three_events()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Backend(_)));
    }

    #[tokio::test]
    async fn openai_backend_speaks_chat_completions() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "분석 결과"}}]
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let config = AnalysisConfig {
            backend_type: BackendType::OpenAi,
            api_url: server.uri(),
            api_key: "test-key".to_owned(),
            model: "gpt-4o-mini".to_owned(),
        };
        let client = AnalysisClient::new(&config).unwrap();
        let text = client.analyze(&three_events()).await.unwrap();
        assert_eq!(text, "분석 결과");
        server.verify().await;
    }
}
