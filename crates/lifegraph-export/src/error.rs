//! Error types for the document export pipeline.
//!
//! Any failure aborts the pipeline before an artifact is produced; there
//! is never a partial document. Full detail goes to the log. The display
//! form is technical; [`ExportError::user_message`] carries the stable
//! generic notice should the shell choose to surface it.

/// Errors that can occur while exporting the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// No analysis text was available when export was triggered.
    #[error("export precondition failed: no analysis text")]
    MissingAnalysis,

    /// No chart snapshot was available when export was triggered.
    #[error("export precondition failed: no chart snapshot")]
    MissingChart,

    /// The off-screen stage is already claimed by an in-flight export.
    #[error("off-screen stage is already in use by another export")]
    StageBusy,

    /// The layout could not be rasterized.
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// The raster could not be laid across pages.
    #[error("pagination failed: {0}")]
    Pagination(String),

    /// The PDF container could not be assembled.
    #[error("pdf emission failed: {0}")]
    Pdf(String),

    /// Checked arithmetic overflowed while computing layout geometry.
    #[error("arithmetic overflow in export geometry")]
    ArithmeticOverflow,
}

impl ExportError {
    /// The stable, user-presentable notice for an export failure (ko-KR).
    pub const fn user_message(&self) -> &'static str {
        "PDF 생성 중 오류가 발생했습니다."
    }
}
