//! Sub-score scalers and the composite recommendation score
//!
//! The composite is the sum of four parts on a nominal 0-150 scale:
//!
//! | Part | Source | Nominal max |
//! |---|---|---|
//! | AI score | sum of the five category scores | 50 |
//! | Piotroski | F-Score scaled from 0-9 | 25 |
//! | Altman Z | piecewise-linear over the zone boundaries | 25 |
//! | News | sentiment score | 50 |
//!
//! The composite is not clamped. Out-of-range inputs produce out-of-range
//! composites; display code clamps with [`display_score`].

use crate::config::ScoringPolicy;
use crate::normalizer::NormalizedPayload;
use serde::{Deserialize, Serialize};

/// Upper bound of a single category score
pub const CATEGORY_MAX: f64 = 10.0;
/// Upper bound of the news sentiment score
pub const NEWS_MAX: f64 = 50.0;
/// Upper bound of the Piotroski F-Score
pub const PIOTROSKI_MAX: f64 = 9.0;
/// Ceiling of each scaled financial-health sub-score
pub const SUBSCORE_CEILING: f64 = 25.0;
/// Z-Scores at or above this are Safe
pub const ALTMAN_SAFE_THRESHOLD: f64 = 3.0;
/// Z-Scores at or below this are Distress
pub const ALTMAN_DISTRESS_THRESHOLD: f64 = 1.8;
/// Width of the grey zone between the two thresholds
const ALTMAN_GREY_WIDTH: f64 = 1.2;
/// Nominal ceiling of the composite score
pub const COMPOSITE_CEILING: i64 = 150;

/// Scale a Piotroski F-Score onto 0-25; values above 9 count as 9
pub fn scale_piotroski(raw: f64) -> f64 {
    (raw.min(PIOTROSKI_MAX) / PIOTROSKI_MAX) * SUBSCORE_CEILING
}

/// Scale an Altman Z-Score onto 0-25, linear across the grey zone
pub fn scale_altman_z(z: f64) -> f64 {
    if z >= ALTMAN_SAFE_THRESHOLD {
        SUBSCORE_CEILING
    } else if z <= ALTMAN_DISTRESS_THRESHOLD {
        0.0
    } else {
        ((z - ALTMAN_DISTRESS_THRESHOLD) / ALTMAN_GREY_WIDTH) * SUBSCORE_CEILING
    }
}

/// Round half up, e.g. 107.5 -> 108 and -2.5 -> -2
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Clamp a stored composite onto the 0-150 display scale
pub fn display_score(composite: i64) -> i64 {
    composite.clamp(0, COMPOSITE_CEILING)
}

/// The four inputs of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Sum of the category scores
    pub ai_score: f64,
    pub piotroski_scaled: f64,
    pub altman_z_scaled: f64,
    /// News sentiment after defaulting
    pub news_score: f64,
}

impl ScoreBreakdown {
    /// Derive the breakdown from a normalized payload
    pub fn compute(payload: &NormalizedPayload, policy: &ScoringPolicy) -> Self {
        let ai_score = payload.scores.iter().map(|item| item.score).sum();

        let piotroski_raw = payload.advanced_analysis.piotroski.score;
        let piotroski_raw = if policy.clamp_negative_piotroski {
            piotroski_raw.max(0.0)
        } else {
            piotroski_raw
        };

        Self {
            ai_score,
            piotroski_scaled: scale_piotroski(piotroski_raw),
            altman_z_scaled: scale_altman_z(payload.advanced_analysis.altman_z.score),
            news_score: payload.news_score,
        }
    }

    /// Unrounded sum of the four parts
    pub fn sum(&self) -> f64 {
        self.ai_score + self.piotroski_scaled + self.altman_z_scaled + self.news_score
    }

    /// Composite recommendation score, rounded, unclamped
    pub fn composite(&self) -> i64 {
        round_half_up(self.sum())
    }
}
