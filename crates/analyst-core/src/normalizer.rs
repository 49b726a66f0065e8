//! Schema validation and defaulting of the parsed payload
//!
//! Required fields are checked here, exhaustively, so that scoring can never
//! hit an absent value. Optional fields receive the defaults of
//! [`ScoringPolicy`]. Suspicious but usable values are kept and reported as
//! [`QualityWarning`]s.

use crate::config::ScoringPolicy;
use crate::error::{AnalysisError, Result};
use crate::payload::{CandidatePayload, CandidateScoreItem};
use crate::scoring::{CATEGORY_MAX, NEWS_MAX, PIOTROSKI_MAX};
use crate::types::{
    AdvancedAnalysis, AltmanZScore, AltmanZone, Hardfacts, NewsItem, PiotroskiScore,
    Recommendation, RiskLevel, ScoreItem,
};
use analyst_llm::WebSource;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Number of categories the provider is asked to score
pub const EXPECTED_CATEGORY_COUNT: usize = 5;

/// Data-quality finding that did not prevent a record from being built
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QualityWarning {
    /// Category score outside 0-10
    #[serde(rename_all = "camelCase")]
    CategoryScoreOutOfRange {
        category: String,
        raw: f64,
        /// Value stored in the record
        applied: f64,
    },
    /// Category without a numeric score; 0 was used
    CategoryScoreMissing { index: usize },
    /// Provider returned a different number of categories
    UnexpectedCategoryCount { expected: usize, actual: usize },
    /// News score outside 0-50, passed through unchanged
    NewsScoreOutOfRange { raw: f64 },
    /// Piotroski score outside 0-9
    PiotroskiOutOfRange { raw: f64 },
    /// Label missing or not one of the known values; left unclassified
    UnclassifiedLabel {
        field: String,
        value: Option<String>,
    },
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryScoreOutOfRange {
                category,
                raw,
                applied,
            } => write!(
                f,
                "category '{category}' scored {raw} outside 0-{CATEGORY_MAX}, using {applied}"
            ),
            Self::CategoryScoreMissing { index } => {
                write!(f, "category #{index} has no numeric score, using 0")
            }
            Self::UnexpectedCategoryCount { expected, actual } => {
                write!(f, "expected {expected} score categories, got {actual}")
            }
            Self::NewsScoreOutOfRange { raw } => {
                write!(f, "news score {raw} outside 0-{NEWS_MAX}")
            }
            Self::PiotroskiOutOfRange { raw } => {
                write!(f, "Piotroski score {raw} outside 0-{PIOTROSKI_MAX}")
            }
            Self::UnclassifiedLabel { field, value: None } => {
                write!(f, "{field} is missing, left unclassified")
            }
            Self::UnclassifiedLabel {
                field,
                value: Some(value),
            } => write!(f, "{field} has unknown value {value:?}, left unclassified"),
        }
    }
}

/// Payload with every required field present and every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPayload {
    pub company_name: String,
    pub ticker: String,
    pub current_price: String,
    pub currency: String,
    pub price_trend_30d: String,
    pub scores: Vec<ScoreItem>,
    pub news_score: f64,
    pub advanced_analysis: AdvancedAnalysis,
    pub recommendation: Option<Recommendation>,
    pub risk_level: Option<RiskLevel>,
    pub hardfacts: Hardfacts,
    pub business_model_risk: String,
    pub company_profile: String,
    pub summary: String,
    pub disclaimer: String,
    pub news: Vec<NewsItem>,
    /// Citations listed inside the payload itself
    pub declared_sources: Vec<WebSource>,
    pub warnings: Vec<QualityWarning>,
}

/// Validate a parsed object tree and apply defaults
pub fn normalize(tree: Value, policy: &ScoringPolicy) -> Result<NormalizedPayload> {
    let candidate = CandidatePayload::from_value(tree)
        .map_err(|e| AnalysisError::shape("payload", e.to_string()))?;

    let mut warnings = Vec::new();

    let raw_scores = candidate
        .scores
        .ok_or_else(|| AnalysisError::shape("scores", "is missing or not an array"))?;

    let advanced = candidate
        .advanced_analysis
        .ok_or_else(|| AnalysisError::missing("advancedAnalysis"))?;
    let piotroski = advanced
        .piotroski
        .ok_or_else(|| AnalysisError::missing("advancedAnalysis.piotroski"))?;
    let piotroski_score = piotroski.score.ok_or_else(|| {
        AnalysisError::shape("advancedAnalysis.piotroski.score", "is missing or not a number")
    })?;
    let altman = advanced
        .altman_z
        .ok_or_else(|| AnalysisError::missing("advancedAnalysis.altmanZ"))?;
    let altman_score = altman.score.ok_or_else(|| {
        AnalysisError::shape("advancedAnalysis.altmanZ.score", "is missing or not a number")
    })?;
    let zone: Option<AltmanZone> =
        classify(altman.zone, "advancedAnalysis.altmanZ.zone", &mut warnings);
    let recommendation: Option<Recommendation> =
        classify(candidate.recommendation, "recommendation", &mut warnings);
    let risk_level: Option<RiskLevel> = classify(candidate.risk_level, "riskLevel", &mut warnings);

    let scores = normalize_scores(raw_scores, policy, &mut warnings);

    let news_score = match candidate.news_score {
        Some(raw) => {
            if !(0.0..=NEWS_MAX).contains(&raw) {
                warnings.push(QualityWarning::NewsScoreOutOfRange { raw });
            }
            raw
        }
        None => policy.default_news_score,
    };

    if !(0.0..=PIOTROSKI_MAX).contains(&piotroski_score) {
        warnings.push(QualityWarning::PiotroskiOutOfRange {
            raw: piotroski_score,
        });
    }

    for warning in &warnings {
        warn!(%warning, "Provider payload quality issue");
    }

    let hardfacts = candidate.hardfacts.unwrap_or_default();

    Ok(NormalizedPayload {
        company_name: candidate.company_name.unwrap_or_default(),
        ticker: candidate.ticker.unwrap_or_default(),
        current_price: candidate.current_price.unwrap_or_default(),
        currency: candidate.currency.unwrap_or_default(),
        price_trend_30d: candidate.price_trend30d.unwrap_or_default(),
        scores,
        news_score,
        advanced_analysis: AdvancedAnalysis {
            piotroski: PiotroskiScore {
                score: piotroski_score,
                interpretation: piotroski.interpretation.unwrap_or_default(),
            },
            altman_z: AltmanZScore {
                score: altman_score,
                interpretation: altman.interpretation.unwrap_or_default(),
                zone,
            },
        },
        recommendation,
        risk_level,
        hardfacts: Hardfacts {
            revenue: hardfacts.revenue.unwrap_or_default(),
            profit: hardfacts.profit.unwrap_or_default(),
            pe_ratio: hardfacts.pe_ratio.unwrap_or_default(),
            dividend: hardfacts.dividend.unwrap_or_default(),
            dividend_yield: hardfacts.dividend_yield.unwrap_or_default(),
            equity_ratio: hardfacts.equity_ratio.unwrap_or_default(),
        },
        business_model_risk: candidate.business_model_risk.unwrap_or_default(),
        company_profile: candidate.company_profile.unwrap_or_default(),
        summary: candidate.summary.unwrap_or_default(),
        disclaimer: candidate.disclaimer.unwrap_or_default(),
        news: candidate
            .news
            .unwrap_or_default()
            .into_iter()
            .map(|item| NewsItem {
                title: item.title.unwrap_or_default(),
                source: item.source.unwrap_or_default(),
                date: item.date.unwrap_or_default(),
                url: item.url,
            })
            .collect(),
        declared_sources: candidate
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(|source| WebSource {
                uri: source.uri,
                title: source.title,
            })
            .collect(),
        warnings,
    })
}

/// Map a display label onto its enum; unusable labels only produce a warning
fn classify<T>(value: Option<String>, field: &str, warnings: &mut Vec<QualityWarning>) -> Option<T>
where
    T: FromStr,
{
    let parsed = value.as_deref().and_then(|label| label.parse().ok());
    if parsed.is_none() {
        warnings.push(QualityWarning::UnclassifiedLabel {
            field: field.to_string(),
            value,
        });
    }
    parsed
}

fn normalize_scores(
    items: Vec<CandidateScoreItem>,
    policy: &ScoringPolicy,
    warnings: &mut Vec<QualityWarning>,
) -> Vec<ScoreItem> {
    if items.len() != EXPECTED_CATEGORY_COUNT {
        warnings.push(QualityWarning::UnexpectedCategoryCount {
            expected: EXPECTED_CATEGORY_COUNT,
            actual: items.len(),
        });
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let category = item.category.unwrap_or_default();
            let score = match item.score {
                Some(raw) if (0.0..=CATEGORY_MAX).contains(&raw) => raw,
                Some(raw) => {
                    let applied = if policy.clamp_category_scores {
                        raw.clamp(0.0, CATEGORY_MAX)
                    } else {
                        raw
                    };
                    warnings.push(QualityWarning::CategoryScoreOutOfRange {
                        category: category.clone(),
                        raw,
                        applied,
                    });
                    applied
                }
                None => {
                    warnings.push(QualityWarning::CategoryScoreMissing { index });
                    0.0
                }
            };

            ScoreItem {
                category,
                score,
                reasoning: item.reasoning.unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "companyName": "Siemens AG",
            "ticker": "SIE",
            "currentPrice": "182,40",
            "currency": "EUR",
            "priceTrend30d": "+4.1%",
            "scores": [
                {"category": "Valuation", "score": 6, "reasoning": "fair"},
                {"category": "Growth", "score": 8, "reasoning": "solid"},
                {"category": "Dividend", "score": 7, "reasoning": "stable"},
                {"category": "Trend", "score": 9, "reasoning": "up"},
                {"category": "Sentiment", "score": 10, "reasoning": "positive"}
            ],
            "newsScore": 30,
            "recommendation": "KAUFEN",
            "riskLevel": "Mittel",
            "hardfacts": {"revenue": "77.8 Mrd", "peRatio": "18.2"},
            "advancedAnalysis": {
                "piotroski": {"score": 7, "interpretation": "Strong"},
                "altmanZ": {"score": 2.4, "interpretation": "Grey Zone", "zone": "Grey"}
            },
            "news": [{"title": "Orders up", "source": "Handelsblatt", "date": "2024-05-02"}],
            "summary": "Solid industrial name."
        })
    }

    #[test]
    fn test_complete_payload() {
        let normalized = normalize(payload(), &ScoringPolicy::default()).unwrap();

        assert_eq!(normalized.company_name, "Siemens AG");
        assert_eq!(normalized.price_trend_30d, "+4.1%");
        assert_eq!(normalized.scores.len(), 5);
        assert_eq!(normalized.news_score, 30.0);
        assert_eq!(normalized.recommendation, Some(Recommendation::Buy));
        assert_eq!(normalized.risk_level, Some(RiskLevel::Medium));
        assert_eq!(
            normalized.advanced_analysis.altman_z.zone,
            Some(AltmanZone::Grey)
        );
        assert_eq!(normalized.hardfacts.pe_ratio, "18.2");
        assert_eq!(normalized.hardfacts.dividend, "");
        assert_eq!(normalized.news[0].url, None);
        assert!(normalized.declared_sources.is_empty());
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn test_missing_advanced_analysis_is_shape_error() {
        let mut tree = payload();
        tree.as_object_mut().unwrap().remove("advancedAnalysis");

        match normalize(tree, &ScoringPolicy::default()) {
            Err(AnalysisError::PayloadShape { field, .. }) => assert_eq!(field, "advancedAnalysis"),
            other => panic!("Expected PayloadShape, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_nested_scores_are_shape_errors() {
        let mut tree = payload();
        tree["advancedAnalysis"]["piotroski"]
            .as_object_mut()
            .unwrap()
            .remove("score");
        let err = normalize(tree, &ScoringPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::PayloadShape { ref field, .. } if field == "advancedAnalysis.piotroski.score"
        ));

        let mut tree = payload();
        tree["advancedAnalysis"]["altmanZ"]["score"] = json!("N/A");
        let err = normalize(tree, &ScoringPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::PayloadShape { ref field, .. } if field == "advancedAnalysis.altmanZ.score"
        ));
    }

    #[test]
    fn test_missing_scores_is_shape_error() {
        let mut tree = payload();
        tree["scores"] = json!(null);
        let err = normalize(tree, &ScoringPolicy::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::PayloadShape { ref field, .. } if field == "scores"));
    }

    #[test]
    fn test_unknown_recommendation_is_unclassified() {
        let mut tree = payload();
        tree["recommendation"] = json!("STRONG BUY");
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();

        assert_eq!(normalized.recommendation, None);
        assert_eq!(
            normalized.warnings,
            vec![QualityWarning::UnclassifiedLabel {
                field: "recommendation".to_string(),
                value: Some("STRONG BUY".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_labels_are_unclassified() {
        let mut tree = payload();
        let object = tree.as_object_mut().unwrap();
        object.remove("recommendation");
        object.remove("riskLevel");
        tree["advancedAnalysis"]["altmanZ"]["zone"] = json!("N/A");

        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();

        assert_eq!(normalized.recommendation, None);
        assert_eq!(normalized.risk_level, None);
        assert_eq!(normalized.advanced_analysis.altman_z.zone, None);
        assert_eq!(normalized.advanced_analysis.altman_z.score, 2.4);
        assert_eq!(normalized.warnings.len(), 3);
        assert!(normalized
            .warnings
            .contains(&QualityWarning::UnclassifiedLabel {
                field: "riskLevel".to_string(),
                value: None,
            }));
    }

    #[test]
    fn test_news_score_defaults_to_neutral() {
        let mut tree = payload();
        tree.as_object_mut().unwrap().remove("newsScore");
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(normalized.news_score, 25.0);

        let mut tree = payload();
        tree["newsScore"] = json!(null);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(normalized.news_score, 25.0);
    }

    #[test]
    fn test_explicit_zero_news_score_is_kept() {
        let mut tree = payload();
        tree["newsScore"] = json!(0);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(normalized.news_score, 0.0);
    }

    #[test]
    fn test_news_score_out_of_range_passes_through() {
        let mut tree = payload();
        tree["newsScore"] = json!(60);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(normalized.news_score, 60.0);
        assert_eq!(
            normalized.warnings,
            vec![QualityWarning::NewsScoreOutOfRange { raw: 60.0 }]
        );
    }

    #[test]
    fn test_category_score_clamped_and_flagged() {
        let mut tree = payload();
        tree["scores"][1]["score"] = json!(12);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();

        assert_eq!(normalized.scores[1].score, 10.0);
        assert_eq!(
            normalized.warnings,
            vec![QualityWarning::CategoryScoreOutOfRange {
                category: "Growth".to_string(),
                raw: 12.0,
                applied: 10.0,
            }]
        );
    }

    #[test]
    fn test_category_score_passthrough_policy() {
        let mut tree = payload();
        tree["scores"][0]["score"] = json!(-3);
        let normalized = normalize(tree, &ScoringPolicy::passthrough()).unwrap();
        assert_eq!(normalized.scores[0].score, -3.0);
        assert_eq!(normalized.warnings.len(), 1);
    }

    #[test]
    fn test_missing_item_score_and_count() {
        let mut tree = payload();
        tree["scores"] = json!([
            {"category": "Valuation", "reasoning": "n/a"},
            {"category": "Growth", "score": 5}
        ]);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();

        assert_eq!(normalized.scores[0].score, 0.0);
        assert_eq!(normalized.scores[1].reasoning, "");
        assert!(normalized
            .warnings
            .contains(&QualityWarning::CategoryScoreMissing { index: 0 }));
        assert!(normalized
            .warnings
            .contains(&QualityWarning::UnexpectedCategoryCount {
                expected: 5,
                actual: 2
            }));
    }

    #[test]
    fn test_piotroski_out_of_range_flagged() {
        let mut tree = payload();
        tree["advancedAnalysis"]["piotroski"]["score"] = json!(12);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(normalized.advanced_analysis.piotroski.score, 12.0);
        assert_eq!(
            normalized.warnings,
            vec![QualityWarning::PiotroskiOutOfRange { raw: 12.0 }]
        );
    }

    #[test]
    fn test_declared_sources_are_carried() {
        let mut tree = payload();
        tree["sources"] = json!([{"title": "Report", "uri": "https://r.example"}]);
        let normalized = normalize(tree, &ScoringPolicy::default()).unwrap();
        assert_eq!(
            normalized.declared_sources,
            vec![WebSource {
                uri: Some("https://r.example".to_string()),
                title: Some("Report".to_string()),
            }]
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = QualityWarning::NewsScoreOutOfRange { raw: 70.0 };
        assert_eq!(warning.to_string(), "news score 70 outside 0-50");

        let warning = QualityWarning::UnclassifiedLabel {
            field: "advancedAnalysis.altmanZ.zone".to_string(),
            value: Some("N/A".to_string()),
        };
        assert_eq!(
            warning.to_string(),
            "advancedAnalysis.altmanZ.zone has unknown value \"N/A\", left unclassified"
        );
    }
}
