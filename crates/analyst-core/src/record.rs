//! The assembled analysis record

use crate::normalizer::{NormalizedPayload, QualityWarning};
use crate::scoring::ScoreBreakdown;
use crate::types::{
    AdvancedAnalysis, GroundingSource, Hardfacts, NewsItem, Recommendation, RiskLevel, ScoreItem,
};
use serde::Serialize;

/// Validated, scored result of one analysis
///
/// Built once by [`AnalysisRecord::assemble`] and read through accessors.
/// `total_score` always equals the sum of `scores` and
/// `total_recommendation_score` always equals the rounded breakdown sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    company_name: String,
    ticker: String,
    currency: String,
    current_price: String,
    #[serde(rename = "priceTrend30d")]
    price_trend_30d: String,
    scores: Vec<ScoreItem>,
    total_score: f64,
    news_score: f64,
    advanced_analysis: AdvancedAnalysis,
    score_breakdown: ScoreBreakdown,
    total_recommendation_score: i64,
    recommendation: Option<Recommendation>,
    risk_level: Option<RiskLevel>,
    hardfacts: Hardfacts,
    business_model_risk: String,
    company_profile: String,
    summary: String,
    disclaimer: String,
    news: Vec<NewsItem>,
    sources: Vec<GroundingSource>,
    quality_warnings: Vec<QualityWarning>,
}

impl AnalysisRecord {
    /// Merge normalized fields, derived scores and sources
    pub fn assemble(
        payload: NormalizedPayload,
        breakdown: ScoreBreakdown,
        sources: Vec<GroundingSource>,
    ) -> Self {
        Self {
            company_name: payload.company_name,
            ticker: payload.ticker,
            currency: payload.currency,
            current_price: payload.current_price,
            price_trend_30d: payload.price_trend_30d,
            scores: payload.scores,
            total_score: breakdown.ai_score,
            news_score: breakdown.news_score,
            advanced_analysis: payload.advanced_analysis,
            total_recommendation_score: breakdown.composite(),
            score_breakdown: breakdown,
            recommendation: payload.recommendation,
            risk_level: payload.risk_level,
            hardfacts: payload.hardfacts,
            business_model_risk: payload.business_model_risk,
            company_profile: payload.company_profile,
            summary: payload.summary,
            disclaimer: payload.disclaimer,
            news: payload.news,
            sources,
            quality_warnings: payload.warnings,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Price as a display string, e.g. "182,40"
    pub fn current_price(&self) -> &str {
        &self.current_price
    }

    /// 30-day change as a display string, e.g. "+4.1%"
    pub fn price_trend_30d(&self) -> &str {
        &self.price_trend_30d
    }

    /// Category scores in provider order
    pub fn scores(&self) -> &[ScoreItem] {
        &self.scores
    }

    /// Sum of the category scores (nominal 0-50)
    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// News sentiment after defaulting (nominal 0-50)
    pub fn news_score(&self) -> f64 {
        self.news_score
    }

    pub fn advanced_analysis(&self) -> &AdvancedAnalysis {
        &self.advanced_analysis
    }

    pub fn score_breakdown(&self) -> &ScoreBreakdown {
        &self.score_breakdown
    }

    /// Composite score (nominal 0-150, not clamped)
    pub fn total_recommendation_score(&self) -> i64 {
        self.total_recommendation_score
    }

    /// Provider's call, `None` when its label was not recognized
    pub fn recommendation(&self) -> Option<Recommendation> {
        self.recommendation
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_level
    }

    pub fn hardfacts(&self) -> &Hardfacts {
        &self.hardfacts
    }

    pub fn business_model_risk(&self) -> &str {
        &self.business_model_risk
    }

    pub fn company_profile(&self) -> &str {
        &self.company_profile
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimer
    }

    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    pub fn sources(&self) -> &[GroundingSource] {
        &self.sources
    }

    pub fn quality_warnings(&self) -> &[QualityWarning] {
        &self.quality_warnings
    }
}
