//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use licnav_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType};

/// Trait for LLM provider backends (Gemini, Ollama, OpenAI-compatible endpoints).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in licnav-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Backend kind, used for source attribution.
    fn provider_type(&self) -> ProviderType;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
