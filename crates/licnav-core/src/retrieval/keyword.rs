//! Keyword fallback: case-insensitive substring scan over the record list.

use licnav_types::license::{LicenseRecord, SearchHit};

/// Score assigned to every keyword hit.
pub const KEYWORD_SCORE: f32 = 1.0;

/// Return every record whose title or body contains `query`, ignoring case.
///
/// Records keep their corpus order. A blank query matches nothing.
pub fn keyword_search(records: &[LicenseRecord], query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| r.searchable_text().to_lowercase().contains(&needle))
        .map(|r| SearchHit {
            record: r.clone(),
            score: KEYWORD_SCORE,
        })
        .collect()
}
