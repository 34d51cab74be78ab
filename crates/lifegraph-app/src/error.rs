//! Top-level error type for the application binary.

use lifegraph_analysis::AnalysisError;
use lifegraph_export::ExportError;

use crate::session::SessionError;

/// Anything that can stop the application run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The session refused an operation.
    #[error("session: {0}")]
    Session(#[from] SessionError),

    /// The analysis cycle failed.
    #[error("analysis: {0}")]
    Analysis(#[from] AnalysisError),

    /// The export pipeline failed.
    #[error("export: {0}")]
    Export(#[from] ExportError),

    /// Writing the artifact to disk failed.
    #[error("artifact io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_analysis_error_keeps_its_full_cause() {
        // The original cause must survive the wrap for the process exit
        // path; only the session display is limited to the stable notice.
        let cause = AnalysisError::Backend("gemini returned 429: quota exceeded".to_owned());
        let notice = cause.user_message();
        let wrapped = AppError::from(cause);
        assert!(wrapped.to_string().contains("429"));
        assert!(!notice.contains("429"));
    }
}
