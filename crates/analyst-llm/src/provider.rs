//! Provider trait definition

use async_trait::async_trait;
use crate::{CompletionRequest, CompletionResponse, Result};

/// Trait for analysis providers
///
/// Implementations send a single prompt to a generative model and return its
/// text together with any grounding citations the model reported.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the model
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with prompt and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the raw text and grounding metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;
}
