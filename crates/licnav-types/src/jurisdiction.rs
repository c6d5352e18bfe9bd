//! Jurisdiction profile types.
//!
//! A [`JurisdictionProfile`] is the complete, data-driven description of one
//! state (or the generic fallback): its license corpus, business-phrase
//! mappings, start-a-business steps, and official resource links. Built-in
//! profiles ship as TOML; custom profiles are loaded from the data directory
//! in the same format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::business::BusinessType;
use crate::license::LicenseRecord;

/// Code of the catch-all profile used for unknown or disabled jurisdictions.
pub const GENERIC_CODE: &str = "GENERIC";

/// Full description of one jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisdictionProfile {
    /// Two-letter code (e.g. "DE"), or `GENERIC`.
    pub code: String,
    /// Full name (e.g. "Delaware").
    pub name: String,
    /// Alternative names matched during detection (e.g. "First State").
    #[serde(default)]
    pub nicknames: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helpline: Option<String>,
    /// Official license search page, shown when nothing matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
    /// Requirements that apply to every business in the jurisdiction.
    #[serde(default)]
    pub general_requirements: Vec<String>,
    /// Steps shown after business-phrase matches.
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Agency names credited in the Sources section of answers.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Top-level official links handed to the LLM prompt.
    #[serde(default)]
    pub official_links: Vec<String>,
    /// Business type key -> license names expected for that type.
    #[serde(default)]
    pub license_categories: BTreeMap<String, Vec<String>>,
    /// Phrase -> license types, consulted when similarity search is empty.
    #[serde(default)]
    pub keyword_mappings: Vec<KeywordMapping>,
    #[serde(default)]
    pub records: Vec<LicenseRecord>,
    #[serde(default)]
    pub steps: Vec<BusinessStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_total_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_total_timeline: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceLink>,
}

impl JurisdictionProfile {
    pub fn is_generic(&self) -> bool {
        self.code.eq_ignore_ascii_case(GENERIC_CODE)
    }

    /// License names configured for `business_type`, if any.
    pub fn licenses_for(&self, business_type: BusinessType) -> &[String] {
        self.license_categories
            .get(business_type.as_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a record by its license type (case-insensitive).
    pub fn record_by_license_type(&self, license_type: &str) -> Option<&LicenseRecord> {
        self.records.iter().find(|r| {
            r.license_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(license_type))
        })
    }

    /// Distinct resource categories in declaration order.
    pub fn resource_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for link in &self.resources {
            if !seen.contains(&link.category.as_str()) {
                seen.push(&link.category);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub url: String,
}

/// A business phrase and the license types it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMapping {
    pub phrase: String,
    pub licenses: Vec<String>,
}

/// One step in the jurisdiction's start-a-business sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessStep {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// An official resource link grouped by category ("main", "licenses", "taxes", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub category: String,
    pub name: String,
    pub url: String,
}

/// Summary of a loaded guide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideInfo {
    pub code: String,
    pub name: String,
    pub record_count: usize,
    /// Whether the vector index is currently serving searches.
    pub vector_search: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
code = "TX"
name = "Texas"
nicknames = ["Lone Star State"]
general_requirements = ["Texas Business Registration"]

[license_categories]
food_hospitality = ["Texas Food Service License"]

[[keyword_mappings]]
phrase = "payday"
licenses = ["Consumer Credit License"]

[[records]]
id = "tx-consumer-credit"
title = "Texas Consumer Credit License"
text = "Required for consumer lenders."
category = "Financial Services"
license_type = "Consumer Credit License"
source_url = "https://occc.texas.gov/"

[[resources]]
category = "main"
name = "Texas Business Portal"
url = "https://gov.texas.gov/business"

[[resources]]
category = "taxes"
name = "Comptroller"
url = "https://comptroller.texas.gov/"

[[resources]]
category = "main"
name = "Secretary of State"
url = "https://www.sos.state.tx.us/"
"#;

    #[test]
    fn test_profile_deserialize() {
        let profile: JurisdictionProfile = toml::from_str(PROFILE).unwrap();
        assert_eq!(profile.code, "TX");
        assert!(!profile.is_generic());
        assert_eq!(profile.records.len(), 1);
        assert!(profile.steps.is_empty());
        assert!(profile.helpline.is_none());
        assert_eq!(profile.keyword_mappings[0].phrase, "payday");
    }

    #[test]
    fn test_licenses_for_business_type() {
        let profile: JurisdictionProfile = toml::from_str(PROFILE).unwrap();
        assert_eq!(
            profile.licenses_for(BusinessType::FoodHospitality),
            &["Texas Food Service License".to_string()]
        );
        assert!(profile.licenses_for(BusinessType::Cannabis).is_empty());
    }

    #[test]
    fn test_record_by_license_type_ignores_case() {
        let profile: JurisdictionProfile = toml::from_str(PROFILE).unwrap();
        let record = profile.record_by_license_type("consumer credit license").unwrap();
        assert_eq!(record.id, "tx-consumer-credit");
        assert!(profile.record_by_license_type("Trust Company License").is_none());
    }

    #[test]
    fn test_resource_categories_keep_first_seen_order() {
        let profile: JurisdictionProfile = toml::from_str(PROFILE).unwrap();
        assert_eq!(profile.resource_categories(), vec!["main", "taxes"]);
    }
}
