//! Configuration and per-provider defaults for OpenAI-compatible endpoints.

use secrecy::SecretString;

use licnav_types::llm::ProviderType;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "gemini").
    pub provider_name: String,
    pub provider_type: ProviderType,
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

/// Google Gemini through its OpenAI-compatible beta endpoint.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        provider_type: ProviderType::Gemini,
        base_url: GEMINI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Any endpoint speaking the OpenAI chat completions protocol.
///
/// Defaults to `https://api.openai.com/v1`.
pub fn openai_compatible_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai_compatible".into(),
        provider_type: ProviderType::OpenAiCompatible,
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

impl OpenAiCompatConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
