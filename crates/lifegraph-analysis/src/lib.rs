//! Analysis client for the Lifegraph application.
//!
//! Formats the life timeline into a natural-language request, invokes the
//! external generative-text service exactly once, and returns its textual
//! result or a classified failure. No retries, no streaming, no session
//! state.
//!
//! # Architecture
//!
//! ```text
//! event snapshot --> Prompt Engine --> LLM Backend (HTTP) --> narrative text
//! ```
//!
//! # Modules
//!
//! - [`client`] -- The [`AnalysisClient`] orchestrating one analysis cycle.
//! - [`prompt`] -- Fixed instruction template and event formatting.
//! - [`llm`] -- HTTP backends (Gemini, `OpenAI`-compatible), enum dispatch.
//! - [`config`] -- Environment-variable configuration.
//! - [`error`] -- The [`AnalysisError`] taxonomy and stable user messages.

pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;

pub use client::{AnalysisClient, MIN_EVENTS_FOR_ANALYSIS};
pub use config::{AnalysisConfig, BackendType};
pub use error::AnalysisError;
