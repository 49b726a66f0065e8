//! Value types carried by an analysis record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five scored categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreItem {
    pub category: String,
    /// Nominally 0-10
    pub score: f64,
    pub reasoning: String,
}

/// Fundamental metrics as display strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardfacts {
    pub revenue: String,
    pub profit: String,
    pub pe_ratio: String,
    pub dividend: String,
    pub dividend_yield: String,
    pub equity_ratio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Deduplicated citation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiotroskiScore {
    /// Raw F-Score as supplied, nominally 0-9
    pub score: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltmanZScore {
    pub score: f64,
    pub interpretation: String,
    /// Zone as classified by the provider; never recomputed. `None` when the
    /// provider gave no usable zone, e.g. "N/A" for banks and insurers
    pub zone: Option<AltmanZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedAnalysis {
    pub piotroski: PiotroskiScore,
    pub altman_z: AltmanZScore,
}

/// Error returned when a label does not map onto one of the enums below
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label {:?}", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', '-'], " ")
}

/// Altman Z-Score zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AltmanZone {
    Safe,
    Grey,
    Distress,
}

impl FromStr for AltmanZone {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "safe" | "safe zone" => Ok(Self::Safe),
            "grey" | "gray" | "grey zone" | "gray zone" => Ok(Self::Grey),
            "distress" | "distress zone" => Ok(Self::Distress),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for AltmanZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "Safe",
            Self::Grey => "Grey",
            Self::Distress => "Distress",
        })
    }
}

/// Provider's qualitative call; independent of the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl FromStr for Recommendation {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "buy" | "kaufen" => Ok(Self::Buy),
            "hold" | "halten" => Ok(Self::Hold),
            "sell" | "verkaufen" => Ok(Self::Sell),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl FromStr for RiskLevel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "low" | "niedrig" => Ok(Self::Low),
            "medium" | "mittel" => Ok(Self::Medium),
            "high" | "hoch" => Ok(Self::High),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}
