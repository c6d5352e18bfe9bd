//! Profile validation.

use std::collections::HashSet;

use licnav_types::error::JurisdictionError;
use licnav_types::jurisdiction::{GENERIC_CODE, JurisdictionProfile};

/// Uppercase and check a jurisdiction code: two ASCII letters, or `GENERIC`.
pub fn normalize_code(code: &str) -> Result<String, JurisdictionError> {
    let upper = code.trim().to_ascii_uppercase();
    if upper == GENERIC_CODE || (upper.len() == 2 && upper.chars().all(|c| c.is_ascii_uppercase()))
    {
        Ok(upper)
    } else {
        Err(JurisdictionError::InvalidCode(code.to_string()))
    }
}

/// Reject profiles with a bad code, duplicate or empty record ids, or non-https links.
pub fn validate_profile(profile: &JurisdictionProfile) -> Result<(), JurisdictionError> {
    let code = normalize_code(&profile.code)?;
    let invalid = |reason: String| JurisdictionError::InvalidProfile {
        code: code.clone(),
        reason,
    };

    if profile.name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    let mut ids = HashSet::new();
    for record in &profile.records {
        if record.id.trim().is_empty() {
            return Err(invalid(format!("record '{}' has an empty id", record.title)));
        }
        if !ids.insert(record.id.as_str()) {
            return Err(invalid(format!("duplicate record id '{}'", record.id)));
        }
        require_https(&record.source_url).map_err(|url| {
            invalid(format!("record '{}' source_url must use https: {url}", record.id))
        })?;
    }

    let links = profile
        .resources
        .iter()
        .map(|r| r.url.as_str())
        .chain(profile.contacts.iter().map(|c| c.url.as_str()))
        .chain(profile.official_links.iter().map(String::as_str))
        .chain(profile.search_url.as_deref());
    for url in links {
        require_https(url).map_err(|url| invalid(format!("link must use https: {url}")))?;
    }

    Ok(())
}

fn require_https(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.starts_with("https://") && url.len() > "https://".len() {
        Ok(())
    } else {
        Err(url.to_string())
    }
}
