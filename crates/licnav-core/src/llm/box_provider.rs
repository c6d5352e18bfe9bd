//! Type-erased [`LlmProvider`] held by the navigator.
//!
//! The navigator picks its provider from config at startup, so it stores a
//! `BoxLlmProvider` built over the object-safe `LlmProviderDyn` (boxed
//! futures, blanket-implemented for every `LlmProvider`).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use licnav_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType};

use super::provider::LlmProvider;

type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

pub trait LlmProviderDyn: Send + Sync {
    fn name_dyn(&self) -> &str;
    fn provider_type_dyn(&self) -> ProviderType;
    fn complete_dyn<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<T: LlmProvider> LlmProviderDyn for T {
    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn provider_type_dyn(&self) -> ProviderType {
        self.provider_type()
    }

    fn complete_dyn<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }
}

pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn>,
}

impl BoxLlmProvider {
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    pub fn provider_type(&self) -> ProviderType {
        self.inner.provider_type_dyn()
    }

    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_dyn(request).await
    }

    /// [`complete`](Self::complete) bounded by `timeout`.
    ///
    /// Providers carry their own HTTP timeouts; this one also covers
    /// connection setup and any retries inside the provider.
    pub async fn complete_within(
        &self,
        request: &CompletionRequest,
        timeout: Duration,
    ) -> Result<CompletionResponse, LlmError> {
        match tokio::time::timeout(timeout, self.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(timeout.as_secs())),
        }
    }
}
