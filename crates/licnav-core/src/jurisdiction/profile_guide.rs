//! Data-driven [`LicenseGuide`] built from a [`JurisdictionProfile`].

use std::fmt::Write as _;
use std::sync::Arc;

use licnav_types::error::RetrievalError;
use licnav_types::jurisdiction::{GuideInfo, JurisdictionProfile};
use licnav_types::license::{LicenseRecord, SearchHit};

use super::guide::LicenseGuide;
use crate::detect::text::contains_phrase;
use crate::retrieval::box_embedder::BoxEmbedder;
use crate::retrieval::box_index::BoxVectorIndex;
use crate::retrieval::lookup::{LookupResult, NO_INFORMATION, SimilarityLookup, collection_name};

/// Guide for one jurisdiction, backed by its profile and a similarity lookup.
pub struct ProfileGuide {
    profile: JurisdictionProfile,
    lookup: SimilarityLookup,
}

impl ProfileGuide {
    pub fn new(
        profile: JurisdictionProfile,
        embedder: Option<Arc<BoxEmbedder>>,
        index: Option<Arc<BoxVectorIndex>>,
        similarity_threshold: f32,
    ) -> Self {
        let lookup = SimilarityLookup::new(
            collection_name(&profile.code),
            profile.records.clone(),
            embedder,
            index,
        )
        .with_threshold(similarity_threshold);
        Self { profile, lookup }
    }

    /// A guide that only ever uses keyword search.
    pub fn keyword_only(profile: JurisdictionProfile) -> Self {
        Self::new(profile, None, None, 0.0)
    }

    /// License types implied by business phrases in `query`, deduplicated in mapping order.
    fn mapped_licenses(&self, query: &str) -> Vec<&str> {
        let mut licenses: Vec<&str> = Vec::new();
        for mapping in &self.profile.keyword_mappings {
            if contains_phrase(query, &mapping.phrase) {
                for license in &mapping.licenses {
                    if !licenses.contains(&license.as_str()) {
                        licenses.push(license);
                    }
                }
            }
        }
        licenses
    }

    fn render_hits(&self, out: &mut String, hits: &[SearchHit]) {
        let _ = writeln!(out, "Found {} relevant license types:\n", hits.len());
        for (i, hit) in hits.iter().enumerate() {
            let record = &hit.record;
            let _ = writeln!(out, "{}. **{}**", i + 1, record.display_name());
            let _ = writeln!(out, "   Category: {}", record.category);
            let _ = writeln!(out, "   Relevance Score: {:.3}", hit.score);
            let _ = writeln!(out, "   Description: {}", record.text);
            if !record.requirements.is_empty() {
                let _ = writeln!(out, "   Requirements: {}", record.requirements.join(", "));
            }
            let _ = writeln!(out, "   Source: {}\n", record.source_url);
        }
    }

    fn render_mapped(&self, out: &mut String, query: &str, licenses: &[&str]) {
        let name = &self.profile.name;
        let _ = writeln!(
            out,
            "Based on your business description '{query}', you likely need these {name} licenses:\n"
        );
        for (i, license) in licenses.iter().enumerate() {
            let _ = writeln!(out, "{}. **{}**", i + 1, license);
            match self.profile.record_by_license_type(license) {
                Some(record) => render_record_details(out, record),
                None => {
                    let contact = self
                        .profile
                        .contacts
                        .first()
                        .map_or_else(|| format!("the {name} licensing office"), |c| c.name.clone());
                    let _ = writeln!(out, "   Contact {contact} for details\n");
                }
            }
        }

        if !self.profile.general_requirements.is_empty() {
            out.push_str("**Additional Requirements:**\n");
            for requirement in &self.profile.general_requirements {
                let _ = writeln!(out, "- {requirement}");
            }
            out.push('\n');
        }

        if !self.profile.next_steps.is_empty() {
            out.push_str("**Next Steps:**\n");
            for (i, step) in self.profile.next_steps.iter().enumerate() {
                let _ = writeln!(out, "{}. {step}", i + 1);
            }
        }
    }

    fn render_nothing_found(&self, out: &mut String) {
        let name = &self.profile.name;
        let _ = writeln!(out, "{NO_INFORMATION}\n");
        if !self.profile.general_requirements.is_empty() {
            let _ = writeln!(out, "**General {name} Business Requirements:**");
            for requirement in &self.profile.general_requirements {
                let _ = writeln!(out, "- {requirement}");
            }
            out.push('\n');
        }
        if !self.profile.contacts.is_empty() {
            out.push_str("**Contact Information:**\n");
            for contact in &self.profile.contacts {
                let _ = writeln!(out, "- {}: {}", contact.name, contact.url);
            }
            out.push('\n');
        }
        if let Some(url) = &self.profile.search_url {
            let _ = writeln!(out, "Search all {name} licenses at: {url}");
        }
    }
}

fn render_record_details(out: &mut String, record: &LicenseRecord) {
    let _ = writeln!(out, "   Description: {}", record.text);
    if !record.requirements.is_empty() {
        let _ = writeln!(out, "   Requirements: {}", record.requirements.join(", "));
    }
    let _ = writeln!(out, "   Source: {}\n", record.source_url);
}

impl LicenseGuide for ProfileGuide {
    fn info(&self) -> GuideInfo {
        GuideInfo {
            code: self.profile.code.clone(),
            name: self.profile.name.clone(),
            record_count: self.profile.records.len(),
            vector_search: self.lookup.vector_available(),
        }
    }

    fn profile(&self) -> &JurisdictionProfile {
        &self.profile
    }

    async fn index(&self) -> Result<usize, RetrievalError> {
        self.lookup.index().await
    }

    async fn ensure_indexed(&self) -> usize {
        self.lookup.ensure_indexed().await
    }

    async fn lookup(&self, query: &str, top_k: usize) -> LookupResult {
        self.lookup.search(query, top_k).await
    }

    async fn find_similar(&self, license_type: &str, top_k: usize) -> LookupResult {
        let mut result = self.lookup.search(license_type, top_k.saturating_add(1)).await;
        result.hits.retain(|hit| {
            !hit.record
                .license_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(license_type.trim()))
        });
        result.hits.truncate(top_k);
        result
    }

    async fn search_licenses(&self, query: &str, top_k: usize) -> String {
        let result = self.lookup.search(query, top_k).await;
        let mut out = format!(
            "{} License Search Results for: '{}'\n\n",
            self.profile.name, query
        );

        if !result.hits.is_empty() {
            self.render_hits(&mut out, &result.hits);
            return out;
        }

        let mapped = self.mapped_licenses(query);
        if mapped.is_empty() {
            self.render_nothing_found(&mut out);
        } else {
            self.render_mapped(&mut out, query, &mapped);
        }
        out
    }

    async fn similar_licenses(&self, license_type: &str, top_k: usize) -> String {
        let result = self.find_similar(license_type, top_k).await;
        let mut out = format!("Similar Licenses to '{license_type}':\n\n");
        if result.hits.is_empty() {
            out.push_str(NO_INFORMATION);
            out.push('\n');
            return out;
        }

        let _ = writeln!(out, "Found {} similar license types:\n", result.hits.len());
        for (i, hit) in result.hits.iter().enumerate() {
            let _ = writeln!(out, "{}. **{}**", i + 1, hit.record.display_name());
            let _ = writeln!(out, "   Category: {}", hit.record.category);
            let _ = writeln!(out, "   Similarity Score: {:.3}", hit.score);
            let _ = writeln!(out, "   Description: {}\n", hit.record.text);
        }
        out
    }

    fn business_steps(&self) -> String {
        let name = &self.profile.name;
        if self.profile.steps.is_empty() {
            return format!("No business steps are configured for {name}.");
        }

        let mut out = format!(
            "## Starting a Business in {name}: {}-Step Process\n\n",
            self.profile.steps.len()
        );
        for (i, step) in self.profile.steps.iter().enumerate() {
            let _ = writeln!(out, "### Step {}: {}", i + 1, step.title);
            let _ = writeln!(out, "{}", step.description);
            if let Some(cost) = &step.cost {
                let _ = writeln!(out, "- Cost: {cost}");
            }
            if let Some(timeline) = &step.timeline {
                let _ = writeln!(out, "- Timeline: {timeline}");
            }
            out.push('\n');
        }

        if let Some(cost) = &self.profile.steps_total_cost {
            let _ = writeln!(out, "**Total Estimated Cost:** {cost}");
        }
        if let Some(timeline) = &self.profile.steps_total_timeline {
            let _ = writeln!(out, "**Total Timeline:** {timeline}");
        }
        if let Some(helpline) = &self.profile.helpline {
            let _ = writeln!(out, "\n**Need Help?** Call {helpline}");
        }
        out
    }

    fn license_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for record in &self.profile.records {
            if !categories.contains(&record.category) {
                categories.push(record.category.clone());
            }
        }
        categories
    }

    fn resources(&self, category: Option<&str>) -> String {
        let name = &self.profile.name;
        let available = self.profile.resource_categories();
        let selected: Vec<&str> = match category.map(str::trim) {
            None | Some("") => available.clone(),
            Some(wanted) if wanted.eq_ignore_ascii_case("all") => available.clone(),
            Some(wanted) => available
                .iter()
                .copied()
                .filter(|c| c.eq_ignore_ascii_case(wanted))
                .collect(),
        };

        if selected.is_empty() {
            return format!(
                "No {name} resources found for category '{}'. Available categories: {}",
                category.unwrap_or_default(),
                available.join(", ")
            );
        }

        let mut out = format!("# {name} Government Resources\n\n");
        for cat in selected {
            let _ = writeln!(out, "## {}", title_case(cat));
            for link in self.profile.resources.iter().filter(|l| l.category == cat) {
                let _ = writeln!(out, "- **{}**: {}", link.name, link.url);
            }
            out.push('\n');
        }
        if let Some(helpline) = &self.profile.helpline {
            let _ = writeln!(out, "---\n**Need Help?** Call {helpline}");
        }
        out
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
