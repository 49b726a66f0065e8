//! Raw provider text to analysis record
//!
//! Stages run strictly in order: extract, normalize, score, deduplicate
//! sources, assemble. Every stage is pure, so the same input always yields an
//! equal record.

use crate::config::{AnalystConfig, ScoringPolicy};
use crate::error::Result;
use crate::extractor::{FencedExtractor, PayloadExtractor, extractor_for};
use crate::normalizer::normalize;
use crate::record::AnalysisRecord;
use crate::scoring::ScoreBreakdown;
use crate::sources::dedup_sources;
use analyst_llm::GroundingChunk;
use tracing::debug;

/// Synchronous processing of one provider response
#[derive(Debug)]
pub struct AnalysisPipeline {
    extractor: Box<dyn PayloadExtractor>,
    policy: ScoringPolicy,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(Box::new(FencedExtractor), ScoringPolicy::default())
    }
}

impl AnalysisPipeline {
    pub fn new(extractor: Box<dyn PayloadExtractor>, policy: ScoringPolicy) -> Self {
        Self { extractor, policy }
    }

    /// Pipeline using the configured extraction mode and scoring policy
    pub fn from_config(config: &AnalystConfig) -> Self {
        Self::new(extractor_for(config.extraction), config.scoring.clone())
    }

    /// Turn raw provider text and its grounding citations into a record
    ///
    /// Fails with `PayloadParse` when no JSON object can be recovered and
    /// with `PayloadShape` when a field needed for scoring is missing.
    pub fn process(&self, raw: &str, chunks: &[GroundingChunk]) -> Result<AnalysisRecord> {
        let tree = self.extractor.extract(raw)?;
        debug!(extractor = ?self.extractor, "Extracted payload object");

        let payload = normalize(tree, &self.policy)?;
        debug!(
            categories = payload.scores.len(),
            warnings = payload.warnings.len(),
            "Normalized payload"
        );

        let breakdown = ScoreBreakdown::compute(&payload, &self.policy);
        debug!(?breakdown, composite = breakdown.composite(), "Scored payload");

        let sources = dedup_sources(
            chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .chain(payload.declared_sources.iter()),
        );
        debug!(sources = sources.len(), "Deduplicated sources");

        Ok(AnalysisRecord::assemble(payload, breakdown, sources))
    }
}

/// Process with fenced extraction and the default scoring policy
pub fn process_payload(raw: &str, chunks: &[GroundingChunk]) -> Result<AnalysisRecord> {
    AnalysisPipeline::default().process(raw, chunks)
}
