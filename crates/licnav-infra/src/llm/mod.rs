//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](licnav_core::llm::provider::LlmProvider)
//! implementations and a factory ([`create_provider`]) that builds the
//! configured one from [`LlmConfig`].

pub mod ollama;
pub mod openai_compat;

use secrecy::SecretString;

use licnav_core::llm::box_provider::BoxLlmProvider;
use licnav_types::config::LlmConfig;
use licnav_types::llm::{LlmError, ProviderType};

use self::ollama::{DEFAULT_OLLAMA_URL, OllamaProvider};
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{gemini_defaults, openai_compatible_defaults};

/// Build the configured provider. `Ok(None)` for the offline provider.
///
/// # Errors
///
/// Returns [`LlmError::MissingApiKey`] when a hosted provider's key
/// environment variable is unset or empty.
pub fn create_provider(config: &LlmConfig) -> Result<Option<BoxLlmProvider>, LlmError> {
    let model = config.resolved_model();
    let provider = match config.provider {
        ProviderType::Offline => return Ok(None),
        ProviderType::Gemini => {
            let mut oai = gemini_defaults(resolve_api_key(&config.api_key_env)?, model);
            if let Some(base_url) = config.base_url_override() {
                oai = oai.with_base_url(base_url);
            }
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai))
        }
        ProviderType::OpenAiCompatible => {
            let mut oai = openai_compatible_defaults(resolve_api_key(&config.api_key_env)?, model);
            if let Some(base_url) = config.base_url_override() {
                oai = oai.with_base_url(base_url);
            }
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai))
        }
        ProviderType::Ollama => {
            let base_url = config.base_url_override().unwrap_or(DEFAULT_OLLAMA_URL);
            BoxLlmProvider::new(OllamaProvider::new(base_url, model, config.timeout_secs)?)
        }
    };
    Ok(Some(provider))
}

/// Read an API key from the environment variable `env_var`.
pub fn resolve_api_key(env_var: &str) -> Result<SecretString, LlmError> {
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        _ => Err(LlmError::MissingApiKey(env_var.to_string())),
    }
}
