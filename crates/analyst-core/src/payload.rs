//! Candidate shape of the provider payload
//!
//! Every field is optional: the provider is untrusted, so presence and
//! validity are decided by the normalizer, not by serde. Scalars are read
//! leniently (numbers may arrive as strings and vice versa); a value of the
//! wrong kind reads as absent.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Top-level payload as the provider is asked to produce it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidatePayload {
    #[serde(deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub ticker: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub price_trend30d: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub scores: Option<Vec<CandidateScoreItem>>,
    #[serde(deserialize_with = "lenient_number")]
    pub news_score: Option<f64>,
    #[serde(deserialize_with = "lenient_object")]
    pub advanced_analysis: Option<CandidateAdvancedAnalysis>,
    #[serde(deserialize_with = "lenient_string")]
    pub recommendation: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "lenient_object")]
    pub hardfacts: Option<CandidateHardfacts>,
    #[serde(deserialize_with = "lenient_string")]
    pub business_model_risk: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company_profile: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub disclaimer: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub news: Option<Vec<CandidateNewsItem>>,
    #[serde(deserialize_with = "lenient_list")]
    pub sources: Option<Vec<CandidateSource>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateScoreItem {
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateAdvancedAnalysis {
    #[serde(deserialize_with = "lenient_object")]
    pub piotroski: Option<CandidatePiotroski>,
    #[serde(deserialize_with = "lenient_object")]
    pub altman_z: Option<CandidateAltmanZ>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidatePiotroski {
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateAltmanZ {
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub interpretation: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateHardfacts {
    #[serde(deserialize_with = "lenient_string")]
    pub revenue: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub profit: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub pe_ratio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub dividend: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub dividend_yield: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub equity_ratio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateNewsItem {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateSource {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string", alias = "url")]
    pub uri: Option<String>,
}

impl CandidatePayload {
    /// Read a parsed object tree into the candidate shape
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Numbers, or strings holding a finite number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

/// Strings, with numbers and booleans rendered as text
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Arrays; elements of the wrong shape are skipped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Objects; anything else reads as absent
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}
