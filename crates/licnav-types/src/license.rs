//! License record and retrieval result types.
//!
//! A [`LicenseRecord`] is a static, hand-written license fact belonging to a
//! jurisdiction. Records are created once when a profile is loaded and are
//! never mutated afterwards. [`SearchHit`] pairs a record with the score the
//! similarity lookup assigned to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single license fact in a jurisdiction's corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Stable identifier, unique within the jurisdiction (e.g. "de-money-transmitter").
    pub id: String,
    /// Short display title (e.g. "Delaware Money Transmitter License").
    pub title: String,
    /// Free-text body that is embedded and searched.
    pub text: String,
    /// Grouping label (e.g. "Financial Services").
    pub category: String,
    /// License type name when the record describes a concrete license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    /// Business phrases associated with this record.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Application requirements (background check, surety bond, ...).
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Official page this fact comes from. Must be https.
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_fee: Option<String>,
}

impl LicenseRecord {
    /// The text that is embedded and substring-matched: title followed by body.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.text)
    }

    /// Display name: the license type if present, otherwise the title.
    pub fn display_name(&self) -> &str {
        self.license_type.as_deref().unwrap_or(&self.title)
    }
}

/// Which retrieval path produced a set of hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Embedding + nearest-neighbour search over the vector index.
    Vector,
    /// Case-insensitive substring scan over the fixed record list.
    Keyword,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::Vector => write!(f, "vector"),
            SearchMethod::Keyword => write!(f, "keyword"),
        }
    }
}

/// A record returned by the similarity lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub record: LicenseRecord,
    /// Cosine similarity on the vector path, constant `1.0` on the keyword path.
    pub score: f32,
}

/// A point to be written into the vector index.
///
/// Carries a payload copy of the record so the index is self-describing.
#[derive(Debug, Clone)]
pub struct IndexPoint {
    pub id: String,
    pub title: String,
    pub category: String,
    pub source_url: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// A nearest-neighbour match returned by the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    pub id: String,
    /// Cosine similarity (`1 - cosine distance`).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(license_type: Option<&str>) -> LicenseRecord {
        LicenseRecord {
            id: "de-check-casher".to_string(),
            title: "Delaware Check Casher License".to_string(),
            text: "Required for businesses that cash checks for a fee.".to_string(),
            category: "Financial Services".to_string(),
            license_type: license_type.map(str::to_string),
            keywords: vec!["check cashing".to_string()],
            requirements: vec!["Background check".to_string()],
            source_url: "https://banking.delaware.gov/".to_string(),
            application_fee: None,
            annual_fee: None,
        }
    }

    #[test]
    fn test_searchable_text_joins_title_and_body() {
        let r = record(None);
        assert_eq!(
            r.searchable_text(),
            "Delaware Check Casher License Required for businesses that cash checks for a fee."
        );
    }

    #[test]
    fn test_display_name_prefers_license_type() {
        assert_eq!(record(Some("Check Casher License")).display_name(), "Check Casher License");
        assert_eq!(record(None).display_name(), "Delaware Check Casher License");
    }

    #[test]
    fn test_record_deserialize_defaults() {
        let toml_str = r#"
id = "fl-tax"
title = "Florida Department of Revenue"
text = "Register for state taxes."
category = "tax_registration"
source_url = "https://floridarevenue.com/"
"#;
        let r: LicenseRecord = toml::from_str(toml_str).unwrap();
        assert!(r.license_type.is_none());
        assert!(r.keywords.is_empty());
        assert!(r.requirements.is_empty());
        assert!(r.application_fee.is_none());
    }

    #[test]
    fn test_search_method_serde() {
        let json = serde_json::to_string(&SearchMethod::Keyword).unwrap();
        assert_eq!(json, "\"keyword\"");
        assert_eq!(SearchMethod::Vector.to_string(), "vector");
    }
}
