//! Markdown answer rendering.

use std::fmt::Write as _;

use licnav_types::business::BusinessAnalysis;
use licnav_types::jurisdiction::JurisdictionProfile;
use licnav_types::license::SearchHit;
use licnav_types::llm::ProviderType;

/// Label credited when the guidance text is the built-in fallback.
pub const BUILTIN_SOURCE: &str = "Built-in License Guidance";

/// Label credited when vector retrieval contributed records.
pub const RAG_SOURCE: &str = "Vector Database (RAG)";

/// Inputs to [`render_answer`].
pub struct AnswerParts<'a> {
    pub jurisdiction: &'a JurisdictionProfile,
    pub analysis: &'a BusinessAnalysis,
    pub hits: &'a [SearchHit],
    /// LLM output or fallback text, placed under `## Guidance`.
    pub guidance: &'a str,
    /// Provider that produced `guidance`; `None` for fallback text.
    pub provider: Option<ProviderType>,
    pub rag_used: bool,
}

/// Jurisdiction header and credited sources for an answer.
pub fn source_attribution(
    jurisdiction: &JurisdictionProfile,
    provider: Option<ProviderType>,
    rag_used: bool,
) -> (String, Vec<String>) {
    let header = if jurisdiction.is_generic() {
        "**General Business License Information**".to_string()
    } else {
        format!("**{} Business License Information**", jurisdiction.name)
    };

    let mut sources = jurisdiction.sources.clone();
    sources.push(match provider {
        Some(p) => p.attribution().to_string(),
        None => BUILTIN_SOURCE.to_string(),
    });
    if rag_used {
        sources.push(RAG_SOURCE.to_string());
    }
    (header, sources)
}

/// Render the full answer: Summary, Required Licenses, Estimated Costs,
/// Timeline, Guidance, Sources.
pub fn render_answer(parts: &AnswerParts<'_>) -> String {
    let jurisdiction = parts.jurisdiction;
    let analysis = parts.analysis;
    let location = if jurisdiction.is_generic() {
        "your state".to_string()
    } else {
        jurisdiction.name.clone()
    };
    let mut out = String::new();

    out.push_str("## Summary\n\n");
    let _ = writeln!(
        out,
        "Licensing overview for a **{}** business in **{}**.",
        analysis.business_type.label(),
        location
    );
    if !parts.hits.is_empty() {
        let _ = writeln!(
            out,
            "{} matching license record(s) found in the {} database.",
            parts.hits.len(),
            if jurisdiction.is_generic() { "general" } else { jurisdiction.name.as_str() }
        );
    }

    out.push_str("\n## Required Licenses\n\n");
    for license in &analysis.detected_licenses {
        let _ = writeln!(out, "- {license}");
    }
    for hit in parts.hits {
        let name = hit.record.display_name();
        if analysis.detected_licenses.iter().any(|l| l.eq_ignore_ascii_case(name)) {
            continue;
        }
        let _ = writeln!(out, "- {} ([source]({}))", name, hit.record.source_url);
    }

    let costs = &analysis.estimated_costs;
    out.push_str("\n## Estimated Costs\n\n");
    let _ = writeln!(out, "| Item | Estimate |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Application fee | {} |", costs.application_fee);
    let _ = writeln!(out, "| License fee | {} |", costs.license_fee);
    let _ = writeln!(out, "| Renewal fee | {} |", costs.renewal_fee);
    let _ = writeln!(out, "| Total initial cost | {} |", costs.total_initial);
    let fee_lines: Vec<String> = parts
        .hits
        .iter()
        .filter(|h| h.record.application_fee.is_some() || h.record.annual_fee.is_some())
        .map(|h| {
            let r = &h.record;
            let mut fees = Vec::new();
            if let Some(fee) = &r.application_fee {
                fees.push(format!("application {fee}"));
            }
            if let Some(fee) = &r.annual_fee {
                fees.push(format!("annual {fee}"));
            }
            format!("- {}: {}", r.display_name(), fees.join(", "))
        })
        .collect();
    if !fee_lines.is_empty() {
        out.push_str("\nPublished fees for matching licenses:\n");
        for line in fee_lines {
            let _ = writeln!(out, "{line}");
        }
    }

    out.push_str("\n## Timeline\n\n");
    let _ = writeln!(out, "{}", analysis.timeline);
    if let Some(total) = &jurisdiction.steps_total_timeline {
        let _ = writeln!(out, "\nStarting a business in {location} end to end: {total}.");
    }

    out.push_str("\n## Guidance\n\n");
    let _ = writeln!(out, "{}", parts.guidance.trim());

    let (header, sources) = source_attribution(jurisdiction, parts.provider, parts.rag_used);
    out.push_str("\n## Sources\n\n");
    let _ = writeln!(out, "{header}\n");
    for source in sources {
        let _ = writeln!(out, "- {source}");
    }

    out
}
