//! Extraction, validation and scoring of provider stock analyses
//!
//! A provider is asked for a JSON analysis of one company. Its answer is
//! untrusted text; this crate turns it into an [`AnalysisRecord`] or fails
//! with a typed [`AnalysisError`]. Processing runs in fixed stages:
//!
//! - [`extractor`]: recover the JSON object from the raw text
//! - [`normalizer`]: check required fields, apply defaults, collect warnings
//! - [`scoring`]: scale Piotroski and Altman Z, compute the 0-150 composite
//! - [`sources`]: deduplicate grounding citations by URI
//! - [`record`]: assemble the immutable result
//!
//! [`StockAnalyzer`] wraps the stages around a single provider call.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_core::{AnalystConfig, StockAnalyzer};
//! use analyst_llm::providers::GeminiProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(GeminiProvider::from_env()?);
//!     let config = Arc::new(AnalystConfig::builder().with_env_model().build()?);
//!
//!     let analyzer = StockAnalyzer::new(provider, config)?;
//!     let record = analyzer.analyze("Siemens").await?;
//!     println!("{}: {}", record.company_name(), record.total_recommendation_score());
//!
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod normalizer;
pub mod payload;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod scoring;
pub mod sources;
pub mod types;

pub use analyzer::StockAnalyzer;
pub use config::{AnalystConfig, AnalystConfigBuilder, ExtractionMode, ScoringPolicy};
pub use error::{AnalysisError, Result};
pub use extractor::{BalancedExtractor, FencedExtractor, PayloadExtractor};
pub use normalizer::{NormalizedPayload, QualityWarning};
pub use pipeline::{AnalysisPipeline, process_payload};
pub use record::AnalysisRecord;
pub use scoring::{ScoreBreakdown, display_score};
pub use types::{
    AdvancedAnalysis, AltmanZScore, AltmanZone, GroundingSource, Hardfacts, NewsItem,
    PiotroskiScore, Recommendation, RiskLevel, ScoreItem,
};
