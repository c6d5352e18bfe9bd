//! User input sanitization.

/// Maximum number of characters kept from user input.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Strip `<`, `>`, `"` and `'`, keep the first [`MAX_INPUT_CHARS`] characters, and trim.
pub fn sanitize_input(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .take(MAX_INPUT_CHARS)
        .collect();
    cleaned.trim().to_string()
}
