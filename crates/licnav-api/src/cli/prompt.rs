//! `licnav prompt`: print a filled-in LLM prompt template.
//!
//! Useful for pasting into another assistant, or for checking what the
//! templates produce for a given business.

use anyhow::Result;

use licnav_core::detect::business::analyze_business;
use licnav_core::detect::jurisdiction::detect_jurisdiction;
use licnav_core::prompt::builder::{
    build_cost_prompt, build_industry_prompt, build_main_prompt, build_state_prompt,
    build_timeline_prompt,
};
use licnav_types::jurisdiction::JurisdictionProfile;

use super::PromptKind;
use crate::state::AppState;

pub fn print_prompt(
    state: &AppState,
    query: &str,
    kind: PromptKind,
    state_code: Option<&str>,
    json: bool,
) -> Result<()> {
    let profile = match detect_jurisdiction(query, state.registry().profiles()) {
        Some(profile) => profile,
        None => state.guide(state_code)?.profile(),
    };
    let prompt = render(query, kind, profile);

    if json {
        let out = serde_json::json!({
            "kind": format!("{kind:?}").to_lowercase(),
            "jurisdiction": profile.code,
            "prompt": prompt,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{prompt}");
    }
    Ok(())
}

fn render(query: &str, kind: PromptKind, profile: &JurisdictionProfile) -> String {
    let business = analyze_business(query, Some(profile)).business_type.label();
    match kind {
        PromptKind::Main => {
            let location = if profile.is_generic() {
                "Location: not specified, cover general US requirements.".to_string()
            } else {
                format!("Location: {} ({})", profile.name, profile.code)
            };
            build_main_prompt(query, &location, &profile.sources)
        }
        PromptKind::State => build_state_prompt(&profile.code, query),
        PromptKind::Industry => build_industry_prompt(business, &profile.code),
        PromptKind::Cost => build_cost_prompt(business, &profile.code),
        PromptKind::Timeline => build_timeline_prompt(business, &profile.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licnav_infra::jurisdiction::builtin_profiles;

    fn profile(code: &str) -> JurisdictionProfile {
        builtin_profiles()
            .unwrap()
            .into_iter()
            .find(|p| p.code == code)
            .unwrap()
    }

    #[test]
    fn main_prompt_names_location() {
        let text = render("payday lender", PromptKind::Main, &profile("DE"));
        assert!(text.contains("User query: payday lender"));
        assert!(text.contains("Location: Delaware (DE)"));
    }

    #[test]
    fn generic_main_prompt_has_no_state() {
        let text = render("bakery", PromptKind::Main, &profile("GENERIC"));
        assert!(text.contains("Location: not specified"));
    }

    #[test]
    fn cost_prompt_uses_state_code() {
        let text = render("food truck", PromptKind::Cost, &profile("FL"));
        assert!(text.contains("State: FL"));
    }
}
