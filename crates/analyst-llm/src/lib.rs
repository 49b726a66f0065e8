//! Analysis provider abstraction layer for finanz-analyst
//!
//! This crate provides provider-agnostic abstractions for requesting a
//! grounded, natural-language analysis from a generative model. It includes:
//!
//! - Completion request/response types
//! - Grounding citation types returned alongside the text
//! - Provider trait for model implementations
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod grounding;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use grounding::{GroundingChunk, WebSource};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
