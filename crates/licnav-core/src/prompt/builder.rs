//! LLM prompt builders.
//!
//! The guidance prompt is assembled from XML-tagged sections so the model can
//! tell the rule-based analysis, retrieved records, and conversation context
//! apart:
//!
//! ```text
//! <request>...</request>
//! <analysis>business type, jurisdiction, licenses, requirements, costs, timeline</analysis>
//! <retrieved_records>similarity lookup hits</retrieved_records>
//! <official_resources>jurisdiction links</official_resources>
//! <considerations>...</considerations>
//! <conversation_context>last turns</conversation_context>
//! <instructions>...</instructions>
//! ```

use std::fmt::Write as _;

use licnav_types::business::BusinessAnalysis;
use licnav_types::jurisdiction::JurisdictionProfile;
use licnav_types::license::SearchHit;

/// Number of sources listed in the compliance-guide prompt.
const MAIN_PROMPT_SOURCES: usize = 5;

/// Everything the guidance prompt is built from.
pub struct GuidanceContext<'a> {
    pub query: &'a str,
    pub jurisdiction: &'a JurisdictionProfile,
    pub analysis: &'a BusinessAnalysis,
    pub hits: &'a [SearchHit],
    /// Output of `ConversationHistory::context_block`; empty when disabled or no history.
    pub conversation: &'a str,
}

/// Build the per-turn guidance prompt.
pub fn build_guidance_prompt(ctx: &GuidanceContext<'_>) -> String {
    let jurisdiction = ctx.jurisdiction;
    let analysis = ctx.analysis;
    let location = if jurisdiction.is_generic() {
        "General (no specific state detected)".to_string()
    } else {
        format!("{} ({})", jurisdiction.name, jurisdiction.code)
    };

    let mut sections = Vec::with_capacity(7);

    sections.push(format!(
        "<request>\nYou are a business license compliance expert. Answer the user's question \
         using the analysis and records below.\n\nUser question: {}\n</request>",
        ctx.query
    ));

    let mut block = String::new();
    let _ = writeln!(block, "Business type: {}", analysis.business_type.label());
    let _ = writeln!(block, "Location: {location}");
    block.push_str("\nLikely licenses:\n");
    for (i, license) in analysis.detected_licenses.iter().enumerate() {
        let _ = writeln!(block, "{}. {license}", i + 1);
    }
    block.push_str("\nKey requirements:\n");
    for requirement in &analysis.key_requirements {
        let _ = writeln!(block, "- {requirement}");
    }
    let costs = &analysis.estimated_costs;
    block.push_str("\nEstimated costs:\n");
    let _ = writeln!(block, "- Application fee: {}", costs.application_fee);
    let _ = writeln!(block, "- License fee: {}", costs.license_fee);
    let _ = writeln!(block, "- Renewal fee: {}", costs.renewal_fee);
    let _ = writeln!(block, "- Total initial cost: {}", costs.total_initial);
    let _ = write!(block, "\nTimeline: {}", analysis.timeline);
    sections.push(format!("<analysis>\n{block}\n</analysis>"));

    if !ctx.hits.is_empty() {
        let mut records = String::new();
        for hit in ctx.hits {
            let record = &hit.record;
            let _ = writeln!(records, "- {} [{}] (relevance {:.3})", record.title, record.category, hit.score);
            let _ = writeln!(records, "  {}", record.text);
            if !record.requirements.is_empty() {
                let _ = writeln!(records, "  Requirements: {}", record.requirements.join(", "));
            }
            let _ = writeln!(records, "  Source: {}", record.source_url);
        }
        sections.push(format!(
            "<retrieved_records>\n{}\n</retrieved_records>",
            records.trim_end()
        ));
    }

    if !jurisdiction.official_links.is_empty() {
        let links = jurisdiction
            .official_links
            .iter()
            .map(|l| format!("- {l}"))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("<official_resources>\n{links}\n</official_resources>"));
    }

    if !analysis.special_considerations.is_empty() {
        let items = analysis
            .special_considerations
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("<considerations>\n{items}\n</considerations>"));
    }

    if !ctx.conversation.trim().is_empty() {
        sections.push(format!(
            "<conversation_context>\nEarlier in this conversation:\n{}\n</conversation_context>",
            ctx.conversation.trim_end()
        ));
    }

    sections.push(format!(
        "<instructions>\n\
         - Focus on the likely licenses and the business type above.\n\
         - Give requirements specific to {name}; say so when a detail is not in the records.\n\
         - Quote exact fees from the retrieved records when they are present.\n\
         - Describe the application process step by step with timelines.\n\
         - Cite the official resources.\n\
         - Format the answer as markdown using `###` subsections: Required Licenses, \
         Application Process, Costs, Next Steps.\n\
         </instructions>",
        name = if jurisdiction.is_generic() { "the user's state" } else { jurisdiction.name.as_str() }
    ));

    sections.join("\n\n")
}

/// Full compliance-guide prompt for a query and a location description.
pub fn build_main_prompt(query: &str, location: &str, sources: &[String]) -> String {
    let sources = sources
        .iter()
        .take(MAIN_PROMPT_SOURCES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a business license compliance expert. Write a complete, well-organized \
compliance guide for the request below.

User query: {query}

{location}

Structure the guide with these sections:

# Business License Compliance Guide

## Query Summary
One paragraph restating what the user needs to be licensed for.

## Licensing Requirements
### Required Licenses
For each license: name, issuing agency, governing law, eligible entity types, cost \
(application + license + renewal), due dates, and the official application URL.
### Additional Permits and Registrations
Business registration, tax registration, local permits, industry-specific permits.

## Costs and Timeline
### Initial Costs
Application, license, background check and insurance or bond costs, with a total.
### Ongoing Costs
Renewals, continuing education, insurance premiums, with an annual total.
### Payment Schedule
When each fee is due.

## Application Process
Phase 1, business setup (days 1-30): entity formation, business and tax registration.
Phase 2, license application (days 31-90): documents, submission, background checks.
Phase 3, issuance (days 91-120): approval, license fees, receiving the license.
Give the cost and processing time of every step.

## Official Resources and Contacts
Licensing portal, forms, regulations, fee schedules, agency contact details.

## Deadlines and Ongoing Compliance
Application and renewal deadlines, continuing education, record keeping, annual reports.

## Practical Tips
Ways to reduce cost, avoid delays, and stay compliant.

---

Sources: {sources}
Disclaimer: this is guidance only. Verify every requirement with the official agency."
    )
}

/// Prompt asking for a state-specific guide grounded only in the supplied state data.
pub fn build_state_prompt(state_code: &str, business: &str) -> String {
    format!(
        "You are a {state_code} business licensing specialist. The data supplied with this \
request comes from official {state_code} sources.

Business: {business}
State: {state_code}

Use only the supplied data for:
1. Exact application, license, renewal and background check fees.
2. Official application portals, requirement pages and fee schedules.
3. The exact application steps, documents and processing times.
4. {state_code} regulations, local requirements and compliance deadlines.

Structure the answer as:
# {state_code} Business License Compliance Guide
## Summary
## Required Licenses and Permits
## {state_code}-Specific Requirements
## Costs
## Application Process
## Official Resources
## Deadlines and Compliance
## Contacts

When the supplied data does not cover something, write \
\"Information not available in the {state_code} data\" instead of guessing."
    )
}

/// Prompt for industry-focused licensing guidance.
pub fn build_industry_prompt(industry: &str, state_code: &str) -> String {
    format!(
        "You are a licensing specialist for the {industry} industry in {state_code}.

Industry: {industry}
State: {state_code}

Cover:
1. License types specific to {industry}
2. Industry-specific fees
3. Required training and certifications
4. Industry associations and resources
5. {industry} compliance obligations in {state_code}

Cite official sources and agency contacts."
    )
}

/// Prompt for a detailed cost breakdown.
pub fn build_cost_prompt(business_type: &str, state_code: &str) -> String {
    format!(
        "You are a business licensing cost analyst.

Business type: {business_type}
State: {state_code}

Provide:
1. Application, license and renewal fees
2. Insurance and bond requirements with estimated premiums
3. Training and certification costs
4. Ongoing compliance costs
5. Total startup cost and total annual cost
6. When each payment is due
7. Ways to reduce cost

Use specific dollar amounts."
    )
}

/// Prompt for a detailed licensing timeline.
pub fn build_timeline_prompt(business_type: &str, state_code: &str) -> String {
    format!(
        "You are a business licensing timeline specialist.

Business type: {business_type}
State: {state_code}

Provide:
1. A step-by-step schedule
2. Processing time for each step
3. Critical deadlines
4. How to expedite the process
5. Common delays and how to avoid them
6. Planning recommendations

Use concrete timeframes."
    )
}
