//! Stock analysis service
//!
//! Sends one grounded request per query to the configured provider and runs
//! the response through the [`AnalysisPipeline`].

use crate::config::AnalystConfig;
use crate::error::{AnalysisError, Result};
use crate::pipeline::AnalysisPipeline;
use crate::prompts::build_prompt;
use crate::record::AnalysisRecord;
use analyst_llm::{CompletionRequest, LLMProvider, StopReason};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Analyzes a company by name or ticker
pub struct StockAnalyzer {
    provider: Arc<dyn LLMProvider>,
    config: Arc<AnalystConfig>,
    pipeline: AnalysisPipeline,
}

impl StockAnalyzer {
    /// Create a new analyzer; the configuration is validated here
    pub fn new(provider: Arc<dyn LLMProvider>, config: Arc<AnalystConfig>) -> Result<Self> {
        config.validate()?;
        let pipeline = AnalysisPipeline::from_config(&config);
        Ok(Self {
            provider,
            config,
            pipeline,
        })
    }

    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Run one analysis
    ///
    /// Provider failures are returned unchanged as [`AnalysisError::Provider`].
    /// No retry is attempted.
    #[instrument(skip(self), fields(provider = self.provider.name(), model = %self.config.model))]
    pub async fn analyze(&self, query: &str) -> Result<AnalysisRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AnalysisError::EmptyQuery);
        }

        let request = self.build_request(query)?;
        debug!(prompt_len = request.prompt.len(), "Sending analysis request");

        let response = self.provider.complete(request).await?;
        info!(
            chunks = response.grounding_chunks.len(),
            tokens = response.usage.total(),
            "Received analysis response"
        );

        if response.stop_reason == StopReason::MaxTokens {
            warn!("Provider hit the output token limit, payload may be truncated");
        }

        self.pipeline
            .process(&response.text, &response.grounding_chunks)
            .inspect_err(|err| match err {
                AnalysisError::PayloadParse { reason, raw } => {
                    error!(%reason, raw = %raw, "Failed to parse provider payload");
                }
                other => error!(error = %other, "Failed to process provider payload"),
            })
    }

    fn build_request(&self, query: &str) -> Result<CompletionRequest> {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .prompt(build_prompt(query)?)
            .grounding(true);

        if let Some(max_tokens) = self.config.max_output_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_llm::{CompletionResponse, GroundingChunk, LLMError, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const PAYLOAD: &str = r#"```json
{
  "companyName": "Allianz SE",
  "ticker": "ALV",
  "scores": [
    {"category": "Valuation", "score": 8, "reasoning": ""},
    {"category": "Growth", "score": 7, "reasoning": ""},
    {"category": "Dividend", "score": 9, "reasoning": ""},
    {"category": "Trend", "score": 7, "reasoning": ""},
    {"category": "Sentiment", "score": 8, "reasoning": ""}
  ],
  "newsScore": 35,
  "recommendation": "HALTEN",
  "riskLevel": "Niedrig",
  "advancedAnalysis": {
    "piotroski": {"score": 6, "interpretation": "Solid"},
    "altmanZ": {"score": 3.4, "interpretation": "Safe", "zone": "Safe"}
  }
}
```"#;

    enum Reply {
        Text(&'static str, StopReason),
        RateLimited,
    }

    struct MockProvider {
        reply: Reply,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for MockProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> analyst_llm::Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            match self.reply {
                Reply::Text(text, stop_reason) => Ok(CompletionResponse {
                    text: text.to_string(),
                    grounding_chunks: vec![
                        GroundingChunk::web("https://ir.example", "Investor Relations"),
                        GroundingChunk::web("https://ir.example", "Investor Relations (copy)"),
                    ],
                    stop_reason,
                    usage: TokenUsage::default(),
                }),
                Reply::RateLimited => Err(LLMError::RateLimitExceeded("quota".to_string())),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn analyzer(provider: Arc<MockProvider>, config: AnalystConfig) -> StockAnalyzer {
        StockAnalyzer::new(provider, Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_builds_record() {
        let provider = MockProvider::new(Reply::Text(PAYLOAD, StopReason::EndTurn));
        let analyzer = analyzer(Arc::clone(&provider), AnalystConfig::default());

        let record = analyzer.analyze("  Allianz ").await.unwrap();

        assert_eq!(record.ticker(), "ALV");
        assert_eq!(record.total_score(), 39.0);
        // 39 + 16.67 + 25 + 35 = 115.67
        assert_eq!(record.total_recommendation_score(), 116);
        assert_eq!(record.sources().len(), 1);
        assert_eq!(record.sources()[0].title, "Investor Relations");
        assert_eq!(provider.requests()[0].max_tokens, None);
    }

    #[tokio::test]
    async fn test_request_carries_config() {
        let provider = MockProvider::new(Reply::Text(PAYLOAD, StopReason::EndTurn));
        let config = AnalystConfig::builder()
            .model("gemini-2.5-pro")
            .temperature(0.2)
            .max_output_tokens(4096)
            .build()
            .unwrap();
        let analyzer = analyzer(Arc::clone(&provider), config);

        analyzer.analyze("Allianz").await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gemini-2.5-pro");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(4096));
        assert!(request.grounding);
        assert!(request.prompt.contains(r#""Allianz""#));
    }

    #[tokio::test]
    async fn test_blank_query_skips_provider() {
        let provider = MockProvider::new(Reply::Text(PAYLOAD, StopReason::EndTurn));
        let analyzer = analyzer(Arc::clone(&provider), AnalystConfig::default());

        let err = analyzer.analyze("   ").await.unwrap_err();

        assert!(matches!(err, AnalysisError::EmptyQuery));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_passes_through() {
        let provider = MockProvider::new(Reply::RateLimited);
        let analyzer = analyzer(provider, AnalystConfig::default());

        let err = analyzer.analyze("Allianz").await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Provider(LLMError::RateLimitExceeded(ref msg)) if msg == "quota"
        ));
        assert!(!err.is_payload_error());
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let provider = MockProvider::new(Reply::Text(
            "I could not find that company.",
            StopReason::EndTurn,
        ));
        let analyzer = analyzer(provider, AnalystConfig::default());

        let err = analyzer.analyze("Nonexistent GmbH").await.unwrap_err();

        assert!(matches!(err, AnalysisError::PayloadParse { .. }));
        assert_eq!(
            err.user_message(),
            "The analysis could not be processed. Please try again."
        );
    }

    #[tokio::test]
    async fn test_truncated_response_is_parse_error() {
        let truncated = &PAYLOAD[..PAYLOAD.len() / 2];
        let provider = MockProvider::new(Reply::Text(truncated, StopReason::MaxTokens));
        let analyzer = analyzer(provider, AnalystConfig::default());

        let err = analyzer.analyze("Allianz").await.unwrap_err();
        assert!(matches!(err, AnalysisError::PayloadParse { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let provider = MockProvider::new(Reply::RateLimited);
        let config = AnalystConfig {
            model: String::new(),
            ..AnalystConfig::default()
        };

        let result = StockAnalyzer::new(provider, Arc::new(config));
        assert!(matches!(result, Err(AnalysisError::Config(_))));
    }
}
