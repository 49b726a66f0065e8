//! Error types for analysis operations

use analyst_llm::LLMError;
use thiserror::Error;

/// Errors produced while turning a provider response into an analysis record
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider text could not be parsed as a JSON object
    #[error("Could not parse provider payload: {reason}")]
    PayloadParse {
        /// Parser diagnostic
        reason: String,
        /// Full provider text, kept for logging
        raw: String,
    },

    /// The payload parsed but lacks a field needed for scoring
    #[error("Malformed provider payload: {field} {reason}")]
    PayloadShape {
        /// Dotted JSON path of the offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Transport or provider failure, passed through unchanged
    #[error(transparent)]
    Provider(#[from] LLMError),

    /// The company query was blank
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt template could not be rendered
    #[error("Template error: {0}")]
    Template(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn parse(reason: impl Into<String>, raw: &str) -> Self {
        Self::PayloadParse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    pub(crate) fn shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PayloadShape {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::shape(field, "is missing")
    }

    /// True for failures caused by the provider's text rather than transport
    pub fn is_payload_error(&self) -> bool {
        matches!(self, Self::PayloadParse { .. } | Self::PayloadShape { .. })
    }

    /// Raw provider text for parse failures
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            Self::PayloadParse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Single sentence suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::PayloadParse { .. } => {
                "The analysis could not be processed. Please try again.".to_string()
            }
            Self::PayloadShape { .. } => {
                "The analysis could not be processed: the response was incomplete. Please try again."
                    .to_string()
            }
            Self::Provider(err) => format!("The analysis provider could not be reached: {err}"),
            Self::EmptyQuery => "Please enter a company name or ticker.".to_string(),
            Self::Config(msg) | Self::Template(msg) => format!("Internal configuration problem: {msg}"),
        }
    }
}

impl From<minijinja::Error> for AnalysisError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}
