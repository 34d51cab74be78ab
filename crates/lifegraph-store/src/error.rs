//! Error types for timeline boundary validation.
//!
//! Validation errors carry the fixed user-facing message (single ko-KR
//! locale) as their display form; the structured fields exist for logging
//! and tests. A draft that fails validation never reaches the store.

/// Why a candidate event was rejected at the validation boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The age is outside the valid domain of 1 to 120.
    #[error("유효한 나이를 입력해주세요 (1-120).")]
    AgeOutOfRange {
        /// The rejected age value.
        provided: u8,
    },

    /// The happiness score is outside the valid domain of 1 to 10.
    ///
    /// The form's slider makes this unrepresentable in the UI; the
    /// boundary still re-checks it for programmatic callers.
    #[error("행복 점수는 1에서 10 사이로 입력해주세요.")]
    HappinessOutOfRange {
        /// The rejected happiness value.
        provided: u8,
    },

    /// The description is empty after trimming whitespace.
    #[error("어떤 일이 있었는지 설명해주세요.")]
    EmptyDescription,

    /// The embedded photo's pixel buffer does not match its declared
    /// dimensions.
    #[error("첨부한 사진 데이터가 올바르지 않습니다.")]
    MalformedImage {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Actual pixel buffer length in bytes.
        actual_len: usize,
    },
}
