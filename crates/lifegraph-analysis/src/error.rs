//! Error types for the analysis client.
//!
//! Uses `thiserror` for typed errors that surface through the analysis
//! pipeline: configuration, prompt rendering, and backend calls. The
//! display form carries the technical detail for logs; what the end user
//! sees is the stable message from [`AnalysisError::user_message`] --
//! backend causes are never shown verbatim.

/// Errors that can occur while producing a life analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Fewer than the minimum number of events were supplied.
    ///
    /// This is a synchronous precondition failure; the external service
    /// is never contacted.
    #[error("analysis requires at least 3 events, got {provided}")]
    NotEnoughEvents {
        /// How many events the caller supplied.
        provided: usize,
    },

    /// The generative-text backend returned an error or was unreachable.
    #[error("analysis backend error: {0}")]
    Backend(String),

    /// Failed to render the prompt template.
    #[error("prompt template error: {0}")]
    Template(String),

    /// Configuration is invalid or missing.
    #[error("analysis config error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// The stable, user-presentable message for this failure (ko-KR).
    ///
    /// Identical across all causes within a class, so the UI never leaks
    /// backend detail.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotEnoughEvents { .. } => {
                "분석을 위해 최소 3개 이상의 인생 이벤트를 입력해주세요."
            }
            Self::Backend(_) | Self::Template(_) => {
                "AI 분석에 실패했습니다. 잠시 후 다시 시도해주세요."
            }
            Self::Config(_) => "API_KEY 환경 변수가 설정되지 않았습니다.",
        }
    }
}
