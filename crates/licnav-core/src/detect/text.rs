//! Word-boundary phrase matching.
//!
//! A match must not be embedded inside a larger word: "de" does not match
//! "under" and "bar" does not match "barber".

/// Case-insensitive phrase match at word boundaries.
///
/// A trailing plural `s` or `es` is accepted, so "restaurant" matches
/// "restaurants".
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return false;
    }

    haystack.match_indices(&phrase).any(|(start, _)| {
        let end = start + phrase.len();
        if !boundary_before(&haystack, start) {
            return false;
        }
        let rest = &haystack[end..];
        ["", "s", "es"].iter().any(|suffix| {
            rest.starts_with(suffix) && boundary_at(rest, suffix.len())
        })
    })
}

/// Exact-case token match at word boundaries (used for state codes like "DE").
pub fn contains_token(haystack: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    haystack.match_indices(token).any(|(start, _)| {
        boundary_before(haystack, start) && boundary_at(haystack, start + token.len())
    })
}

fn boundary_before(s: &str, idx: usize) -> bool {
    s[..idx].chars().next_back().is_none_or(|c| !c.is_alphanumeric())
}

fn boundary_at(s: &str, idx: usize) -> bool {
    s[idx..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}
