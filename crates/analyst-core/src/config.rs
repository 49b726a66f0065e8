//! Configuration for analysis operations

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// News sentiment used when the payload carries none (neutral on the 0-50 scale)
pub const DEFAULT_NEWS_SCORE: f64 = 25.0;

/// How the JSON object is recovered from provider text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Strip surrounding code fences, then parse
    #[default]
    Fenced,
    /// Fall back to scanning for the first balanced `{...}` object
    Balanced,
}

/// Defaults and clamping rules applied by the normalizer and scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// News score substituted when the payload has none
    pub default_news_score: f64,

    /// Clamp category scores into [0, 10] (a warning is recorded either way)
    pub clamp_category_scores: bool,

    /// Treat negative Piotroski scores as 0 before scaling
    pub clamp_negative_piotroski: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            default_news_score: DEFAULT_NEWS_SCORE,
            clamp_category_scores: true,
            clamp_negative_piotroski: true,
        }
    }
}

impl ScoringPolicy {
    /// Policy that reproduces plain pass-through of provider values
    pub fn passthrough() -> Self {
        Self {
            clamp_category_scores: false,
            clamp_negative_piotroski: false,
            ..Self::default()
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<()> {
        if !self.default_news_score.is_finite() || !(0.0..=50.0).contains(&self.default_news_score) {
            return Err(AnalysisError::Config(format!(
                "default_news_score must be within 0..=50, got {}",
                self.default_news_score
            )));
        }
        Ok(())
    }
}

/// Configuration for analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Provider model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Output token limit, provider default when unset
    pub max_output_tokens: Option<usize>,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Payload recovery strategy
    pub extraction: ExtractionMode,

    /// Score defaults and clamping
    pub scoring: ScoringPolicy,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            request_timeout: Duration::from_secs(120),
            extraction: ExtractionMode::Fenced,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AnalysisError::Config("model must not be empty".to_string()));
        }

        if self.max_output_tokens == Some(0) {
            return Err(AnalysisError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AnalysisError::Config(format!(
                    "temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(AnalysisError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        self.scoring.validate()
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<usize>,
    request_timeout: Option<Duration>,
    extraction: Option<ExtractionMode>,
    scoring: Option<ScoringPolicy>,
}

impl AnalystConfigBuilder {
    /// Set the provider model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Read the model from `GEMINI_MODEL` if set
    pub fn with_env_model(mut self) -> Self {
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.model = Some(model);
        }
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    pub fn max_output_tokens(mut self, tokens: usize) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the payload recovery strategy
    pub fn extraction(mut self, mode: ExtractionMode) -> Self {
        self.extraction = Some(mode);
        self
    }

    /// Set the scoring policy
    pub fn scoring(mut self, policy: ScoringPolicy) -> Self {
        self.scoring = Some(policy);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.or(defaults.temperature),
            max_output_tokens: self.max_output_tokens.or(defaults.max_output_tokens),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            extraction: self.extraction.unwrap_or(defaults.extraction),
            scoring: self.scoring.unwrap_or(defaults.scoring),
        };

        config.validate()?;
        Ok(config)
    }
}
