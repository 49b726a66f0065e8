//! Grounding citations reported by a provider
//!
//! Providers report the web pages they consulted as loosely-shaped chunks.
//! Either field may be missing; filtering happens downstream.

use serde::{Deserialize, Serialize};

/// Web page a provider claims to have used as evidence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// Page URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One grounding chunk as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web citation, absent for non-web chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

impl GroundingChunk {
    /// Create a web chunk with both fields set
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: Some(WebSource {
                uri: Some(uri.into()),
                title: Some(title.into()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_chunks() {
        let json = r#"[
            {"web": {"uri": "https://a.example", "title": "A"}},
            {"web": {"uri": "https://b.example"}},
            {}
        ]"#;
        let chunks: Vec<GroundingChunk> = serde_json::from_str(json).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], GroundingChunk::web("https://a.example", "A"));
        assert_eq!(chunks[1].web.as_ref().unwrap().title, None);
        assert!(chunks[2].web.is_none());
    }
}
