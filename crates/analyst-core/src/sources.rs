//! Grounding source deduplication

use crate::types::GroundingSource;
use analyst_llm::WebSource;
use std::collections::HashSet;

/// Keep complete citations, first occurrence per URI, in input order
///
/// Citations without a non-empty `uri` and `title` are dropped. A later
/// citation with an already-seen URI never replaces the earlier one.
pub fn dedup_sources<'a, I>(candidates: I) -> Vec<GroundingSource>
where
    I: IntoIterator<Item = &'a WebSource>,
{
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for candidate in candidates {
        let (Some(uri), Some(title)) = (candidate.uri.as_deref(), candidate.title.as_deref())
        else {
            continue;
        };
        if uri.is_empty() || title.is_empty() {
            continue;
        }
        if seen.insert(uri) {
            sources.push(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            });
        }
    }

    sources
}
