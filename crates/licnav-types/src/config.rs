//! Application configuration types.
//!
//! `AppConfig` represents the top-level `config.toml` in the data directory.
//! Every field has a serde default so a partial or empty file is valid.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration.
///
/// Loaded from `~/.licnav/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Jurisdiction used when none is detected in the user's input.
    #[serde(default = "default_state")]
    pub default_state: String,

    /// Jurisdiction codes whose guides are loaded. `GENERIC` is always loaded.
    #[serde(default = "default_enabled_states")]
    pub enabled_states: Vec<String>,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_state() -> String {
    "DE".to_string()
}

fn default_enabled_states() -> Vec<String> {
    vec!["DE".to_string(), "FL".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_state: default_state(),
            enabled_states: default_enabled_states(),
            features: FeatureFlags::default(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn is_state_enabled(&self, code: &str) -> bool {
        self.enabled_states.iter().any(|s| s.eq_ignore_ascii_case(code))
    }

    /// Add `code` to the enabled list. Returns `false` if it was already enabled.
    pub fn enable_state(&mut self, code: &str) -> bool {
        if self.is_state_enabled(code) {
            return false;
        }
        self.enabled_states.push(code.to_ascii_uppercase());
        true
    }

    /// Remove `code` from the enabled list. Returns `false` if it was not enabled.
    pub fn disable_state(&mut self, code: &str) -> bool {
        let before = self.enabled_states.len();
        self.enabled_states.retain(|s| !s.eq_ignore_ascii_case(code));
        before != self.enabled_states.len()
    }
}

/// Feature toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub vector_search: bool,
    #[serde(default = "default_true")]
    pub llm: bool,
    /// Include the last conversation turns in the LLM prompt.
    #[serde(default = "default_true")]
    pub conversation_context: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            vector_search: true,
            llm: true,
            conversation_context: true,
        }
    }
}

/// Settings for the similarity lookup and vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_similar_top_k")]
    pub similar_top_k: usize,
    /// Vector hits scoring below this are dropped. `0.0` disables the filter.
    #[serde(default)]
    pub similarity_threshold: f32,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_vector_dimension")]
    pub vector_dimension: usize,
    /// Index directory, relative to the data dir unless absolute.
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
}

fn default_top_k() -> usize {
    5
}

fn default_similar_top_k() -> usize {
    3
}

fn default_embedding_model() -> String {
    "bge-small-en-v1.5".to_string()
}

fn default_vector_dimension() -> usize {
    384
}

fn default_index_dir() -> String {
    "index".to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            similar_top_k: default_similar_top_k(),
            similarity_threshold: 0.0,
            embedding_model: default_embedding_model(),
            vector_dimension: default_vector_dimension(),
            index_dir: default_index_dir(),
        }
    }
}

/// LLM provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderType,
    /// Model name. Empty means the provider's default (see [`LlmConfig::resolved_model`]).
    #[serde(default)]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Base URL override. Empty means the provider's default.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> ProviderType {
    ProviderType::Gemini
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: String::new(),
            api_key_env: default_api_key_env(),
            base_url: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    pub fn base_url_override(&self) -> Option<&str> {
        let trimmed = self.base_url.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// The configured model, or the provider's default when unset.
    pub fn resolved_model(&self) -> &str {
        let trimmed = self.model.trim();
        if !trimmed.is_empty() {
            return trimmed;
        }
        match self.provider {
            ProviderType::Gemini => "gemini-1.5-flash",
            ProviderType::Ollama => "llama3.1",
            ProviderType::OpenAiCompatible => "gpt-4o-mini",
            ProviderType::Offline => "",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    /// Export spans to stdout via OpenTelemetry.
    #[serde(default)]
    pub otel: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            otel: false,
        }
    }
}

/// Limits for the HTTP server's in-memory sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Sessions kept at once. The least recently used one is dropped first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Sessions untouched for this long are forgotten.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_max_sessions() -> usize {
    1000
}

fn default_session_idle_secs() -> u64 {
    1800
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_state, "DE");
        assert_eq!(config.enabled_states, vec!["DE", "FL"]);
        assert!(config.features.vector_search);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.similar_top_k, 3);
        assert_eq!(config.retrieval.vector_dimension, 384);
        assert_eq!(config.llm.provider, ProviderType::Gemini);
        assert_eq!(config.llm.resolved_model(), "gemini-1.5-flash");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.server.max_sessions, 1000);
        assert_eq!(config.server.session_idle_secs, 1800);
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
default_state = "FL"

[llm]
provider = "ollama"
model = "llama3.1"

[retrieval]
top_k = 8
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_state, "FL");
        assert_eq!(config.llm.provider, ProviderType::Ollama);
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.retrieval.similar_top_k, 3);
        assert!((config.llm.temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enable_disable_state() {
        let mut config = AppConfig::default();
        assert!(!config.enable_state("de"));
        assert!(config.enable_state("tx"));
        assert!(config.is_state_enabled("TX"));
        assert_eq!(config.enabled_states.last().map(String::as_str), Some("TX"));

        assert!(config.disable_state("Fl"));
        assert!(!config.is_state_enabled("FL"));
        assert!(!config.disable_state("FL"));
    }

    #[test]
    fn test_resolved_model_defaults_per_provider() {
        let mut llm = LlmConfig {
            provider: ProviderType::Ollama,
            ..LlmConfig::default()
        };
        assert_eq!(llm.resolved_model(), "llama3.1");
        llm.model = "mistral".to_string();
        assert_eq!(llm.resolved_model(), "mistral");
    }

    #[test]
    fn test_base_url_override() {
        let mut llm = LlmConfig::default();
        assert!(llm.base_url_override().is_none());
        llm.base_url = "  http://localhost:11434 ".to_string();
        assert_eq!(llm.base_url_override(), Some("http://localhost:11434"));
    }

    #[test]
    fn test_app_config_toml_roundtrip() {
        let mut config = AppConfig::default();
        config.enable_state("TX");
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.enabled_states, vec!["DE", "FL", "TX"]);
    }
}
