//! Jurisdiction profile loading.
//!
//! Built-in profiles (Delaware, Florida, generic) are compiled into the
//! binary. Custom profiles live as `{data_dir}/jurisdictions/{code}.toml` in
//! the same format and override a built-in with the same code.

pub mod scaffold;

use licnav_core::jurisdiction::validate::validate_profile;
use licnav_types::config::AppConfig;
use licnav_types::error::JurisdictionError;
use licnav_types::jurisdiction::{GENERIC_CODE, JurisdictionProfile};

pub use scaffold::ProfileStore;

const BUILTIN: [(&str, &str); 3] = [
    ("delaware.toml", include_str!("../../data/delaware.toml")),
    ("florida.toml", include_str!("../../data/florida.toml")),
    ("generic.toml", include_str!("../../data/generic.toml")),
];

/// Parse and validate a profile from TOML text. `origin` names the source in errors.
pub fn parse_profile(origin: &str, content: &str) -> Result<JurisdictionProfile, JurisdictionError> {
    let profile: JurisdictionProfile =
        toml::from_str(content).map_err(|e| JurisdictionError::Parse(format!("{origin}: {e}")))?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// The profiles shipped with the binary.
pub fn builtin_profiles() -> Result<Vec<JurisdictionProfile>, JurisdictionError> {
    BUILTIN
        .iter()
        .map(|(origin, content)| parse_profile(origin, content))
        .collect()
}

/// Built-in and custom profiles filtered to the enabled states.
///
/// The generic profile is always included and always last, so registry
/// order matches detection priority. Custom profiles replace built-ins
/// with the same code.
pub fn enabled_profiles(
    store: &ProfileStore,
    config: &AppConfig,
) -> Result<Vec<JurisdictionProfile>, JurisdictionError> {
    let mut profiles = builtin_profiles()?;
    for custom in store.list_custom()? {
        match profiles
            .iter_mut()
            .find(|p| p.code.eq_ignore_ascii_case(&custom.code))
        {
            Some(existing) => {
                tracing::info!(code = %custom.code, "custom profile overrides built-in");
                *existing = custom;
            }
            None => profiles.push(custom),
        }
    }

    let (generic, states): (Vec<_>, Vec<_>) = profiles.into_iter().partition(|p| p.is_generic());
    let mut enabled: Vec<JurisdictionProfile> = states
        .into_iter()
        .filter(|p| config.is_state_enabled(&p.code))
        .collect();

    for code in &config.enabled_states {
        if !enabled.iter().any(|p| p.code.eq_ignore_ascii_case(code))
            && !code.eq_ignore_ascii_case(GENERIC_CODE)
        {
            tracing::warn!(code = %code, "enabled state has no profile, queries will use the generic guide");
        }
    }

    enabled.extend(generic);
    Ok(enabled)
}
