//! Jurisdiction detection from free text.

use licnav_types::jurisdiction::JurisdictionProfile;

use super::text::{contains_phrase, contains_token};

/// First profile (in the given order) mentioned in `input`.
///
/// A profile matches on its uppercase code as a standalone token, or on its
/// name or a nickname at word boundaries in any case. The generic profile
/// never matches.
pub fn detect_jurisdiction<'a, I>(input: &str, profiles: I) -> Option<&'a JurisdictionProfile>
where
    I: IntoIterator<Item = &'a JurisdictionProfile>,
{
    profiles
        .into_iter()
        .filter(|p| !p.is_generic())
        .find(|p| mentions(input, p))
}

fn mentions(input: &str, profile: &JurisdictionProfile) -> bool {
    contains_token(input, &profile.code.to_ascii_uppercase())
        || contains_phrase(input, &profile.name)
        || profile.nicknames.iter().any(|n| contains_phrase(input, n))
}
