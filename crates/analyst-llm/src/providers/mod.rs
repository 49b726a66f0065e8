//! Concrete provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! various generative-analysis services.

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};
