//! LicenseNavigator: the per-turn answer path.
//!
//! sanitize -> detect jurisdiction -> analyze business -> similarity lookup
//! -> guidance prompt -> LLM (or built-in fallback text) -> markdown answer.
//!
//! The navigator holds no conversation state; [`Conversation`] pairs it with
//! a [`ConversationHistory`] for the REPL, and the HTTP layer keeps one
//! history per session.

use std::sync::Arc;
use std::time::Duration;

use licnav_types::chat::{ConversationTurn, GuidanceAnswer};
use licnav_types::config::AppConfig;
use licnav_types::error::NavigatorError;
use licnav_types::license::SearchMethod;
use licnav_types::llm::{CompletionRequest, LlmError, Message, ProviderType};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::answer::fallback::fallback_response;
use crate::answer::render::{AnswerParts, render_answer};
use crate::chat::history::ConversationHistory;
use crate::chat::sanitize::sanitize_input;
use crate::detect::business::analyze_business;
use crate::detect::jurisdiction::detect_jurisdiction;
use crate::jurisdiction::registry::GuideRegistry;
use crate::llm::box_provider::BoxLlmProvider;
use crate::prompt::builder::{GuidanceContext, build_guidance_prompt};

const SYSTEM_PROMPT: &str = "You are a business license compliance expert. Give accurate, \
    practical licensing guidance and say so when a requirement should be confirmed with the \
    issuing agency.";

/// Per-turn settings taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct NavigatorSettings {
    pub default_state: String,
    pub top_k: usize,
    pub conversation_context: bool,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl NavigatorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_state: config.default_state.clone(),
            top_k: config.retrieval.top_k,
            conversation_context: config.features.conversation_context,
            model: config.llm.resolved_model().to_string(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            timeout_secs: config.llm.timeout_secs,
        }
    }
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Answers business-license questions against a registry of guides.
pub struct LicenseNavigator {
    registry: Arc<GuideRegistry>,
    provider: Option<Arc<BoxLlmProvider>>,
    /// Why `provider` is `None`, reported on every fallback answer.
    provider_unavailable: Option<String>,
    settings: NavigatorSettings,
}

impl LicenseNavigator {
    /// A navigator with no LLM: every answer uses the built-in guidance text.
    pub fn new(registry: Arc<GuideRegistry>, settings: NavigatorSettings) -> Self {
        Self {
            registry,
            provider: None,
            provider_unavailable: None,
            settings,
        }
    }

    pub fn with_provider(mut self, provider: Arc<BoxLlmProvider>) -> Self {
        self.provider = Some(provider);
        self.provider_unavailable = None;
        self
    }

    /// Record why no provider could be built (e.g. a missing API key).
    pub fn with_unavailable_provider(mut self, reason: impl Into<String>) -> Self {
        self.provider = None;
        self.provider_unavailable = Some(reason.into());
        self
    }

    pub fn registry(&self) -> &GuideRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    /// Provider type answering questions, `None` when running on fallback text.
    pub fn provider_type(&self) -> Option<ProviderType> {
        self.provider.as_ref().map(|p| p.provider_type())
    }

    pub fn provider_unavailable(&self) -> Option<&str> {
        self.provider_unavailable.as_deref()
    }

    /// Run the full answer path for one user turn.
    ///
    /// `history` supplies the conversation context block; the caller records
    /// the resulting turn.
    pub async fn ask(
        &self,
        input: &str,
        history: &ConversationHistory,
    ) -> Result<GuidanceAnswer, NavigatorError> {
        let query = sanitize_input(input);
        if query.is_empty() {
            return Err(NavigatorError::EmptyQuery);
        }

        let code = detect_jurisdiction(&query, self.registry.profiles())
            .map(|p| p.code.clone())
            .unwrap_or_else(|| self.settings.default_state.clone());
        let guide = self
            .registry
            .get_or_generic(&code)
            .ok_or_else(|| NavigatorError::NoGuide(code.clone()))?;
        let profile = guide.profile();

        let analysis = analyze_business(&query, Some(profile));
        let lookup = guide.lookup(&query, self.settings.top_k).await;
        let rag_used = lookup.method == SearchMethod::Vector && !lookup.hits.is_empty();
        debug!(
            jurisdiction = %profile.code,
            business_type = %analysis.business_type,
            hits = lookup.hits.len(),
            method = %lookup.method,
            "Turn analyzed"
        );

        let conversation = if self.settings.conversation_context {
            history.context_block()
        } else {
            String::new()
        };
        let prompt = build_guidance_prompt(&GuidanceContext {
            query: &query,
            jurisdiction: profile,
            analysis: &analysis,
            hits: &lookup.hits,
            conversation: &conversation,
        });

        let (guidance, provider, fallback_reason) = match self.generate(prompt).await {
            Ok((text, provider_type)) => (text, Some(provider_type), None),
            Err(reason) => (fallback_response(&query).to_string(), None, Some(reason)),
        };

        let markdown = render_answer(&AnswerParts {
            jurisdiction: profile,
            analysis: &analysis,
            hits: &lookup.hits,
            guidance: &guidance,
            provider,
            rag_used,
        });

        info!(
            jurisdiction = %profile.code,
            business_type = %analysis.business_type,
            provider = provider.map_or("fallback".to_string(), |p| p.to_string()),
            rag_used,
            "Answer ready"
        );

        Ok(GuidanceAnswer {
            query,
            jurisdiction_code: profile.code.clone(),
            jurisdiction_name: profile.name.clone(),
            business_type: analysis.business_type,
            detected_licenses: analysis.detected_licenses,
            hits: lookup.hits,
            method: lookup.method,
            provider,
            fallback_reason,
            rag_used,
            markdown,
        })
    }

    /// Call the provider. `Err` carries the reason the fallback text is used.
    async fn generate(&self, prompt: String) -> Result<(String, ProviderType), String> {
        let Some(provider) = &self.provider else {
            return Err(self
                .provider_unavailable
                .clone()
                .unwrap_or_else(|| "LLM disabled".to_string()));
        };

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );

        let timeout = Duration::from_secs(self.settings.timeout_secs);
        let result = provider
            .complete_within(&request, timeout)
            .instrument(span.clone())
            .await;

        match result {
            Ok(response) if !response.content.trim().is_empty() => {
                span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
                span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
                debug!(
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM response received"
                );
                Ok((response.content, provider.provider_type()))
            }
            Ok(_) => {
                warn!(provider = provider.name(), "LLM returned empty text, using fallback");
                Err(LlmError::EmptyResponse.to_string())
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "LLM call failed, using fallback");
                Err(e.to_string())
            }
        }
    }
}

/// A navigator plus the history of one conversation.
pub struct Conversation {
    navigator: Arc<LicenseNavigator>,
    history: ConversationHistory,
}

impl Conversation {
    pub fn new(navigator: Arc<LicenseNavigator>) -> Self {
        Self {
            navigator,
            history: ConversationHistory::new(),
        }
    }

    /// Answer `input` and append the turn to the history.
    pub async fn ask(&mut self, input: &str) -> Result<GuidanceAnswer, NavigatorError> {
        let answer = self.navigator.ask(input, &self.history).await?;
        self.history
            .record(ConversationTurn::new(answer.query.clone(), answer.markdown.clone()));
        Ok(answer)
    }

    pub fn navigator(&self) -> &LicenseNavigator {
        &self.navigator
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::box_guide::BoxLicenseGuide;
    use crate::jurisdiction::guide::LicenseGuide;
    use crate::jurisdiction::profile_guide::ProfileGuide;
    use crate::retrieval::box_embedder::BoxEmbedder;
    use crate::retrieval::box_index::BoxVectorIndex;
    use crate::test_support::{FakeEmbedder, FakeIndex, FakeProvider, sample_profile};
    use licnav_types::business::BusinessType;

    fn florida() -> licnav_types::jurisdiction::JurisdictionProfile {
        let mut profile = sample_profile();
        profile.code = "FL".to_string();
        profile.name = "Florida".to_string();
        profile.nicknames = vec!["Sunshine State".to_string()];
        profile.sources = vec!["Florida Division of Corporations".to_string()];
        profile
    }

    fn generic() -> licnav_types::jurisdiction::JurisdictionProfile {
        let mut profile = sample_profile();
        profile.code = "GENERIC".to_string();
        profile.name = "General".to_string();
        profile.nicknames.clear();
        profile
    }

    async fn registry_with_vectors() -> Arc<GuideRegistry> {
        let embedder = Arc::new(BoxEmbedder::new(FakeEmbedder::new()));
        let index = Arc::new(BoxVectorIndex::new(FakeIndex::new()));
        let delaware = ProfileGuide::new(
            sample_profile(),
            Some(Arc::clone(&embedder)),
            Some(Arc::clone(&index)),
            0.0,
        );
        delaware.ensure_indexed().await;

        let mut registry = GuideRegistry::new();
        registry.register(BoxLicenseGuide::new(delaware));
        registry.register(BoxLicenseGuide::new(ProfileGuide::keyword_only(florida())));
        registry.register(BoxLicenseGuide::new(ProfileGuide::keyword_only(generic())));
        Arc::new(registry)
    }

    fn keyword_registry() -> Arc<GuideRegistry> {
        let mut registry = GuideRegistry::new();
        registry.register(BoxLicenseGuide::new(ProfileGuide::keyword_only(sample_profile())));
        registry.register(BoxLicenseGuide::new(ProfileGuide::keyword_only(florida())));
        registry.register(BoxLicenseGuide::new(ProfileGuide::keyword_only(generic())));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let navigator = LicenseNavigator::new(keyword_registry(), NavigatorSettings::default());
        let err = navigator
            .ask("  <>\"' ", &ConversationHistory::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NavigatorError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_missing_key_serves_fallback_text() {
        let navigator = LicenseNavigator::new(keyword_registry(), NavigatorSettings::default())
            .with_unavailable_provider(
                LlmError::MissingApiKey("GEMINI_API_KEY".to_string()).to_string(),
            );

        let answer = navigator
            .ask("I want to open a bakery", &ConversationHistory::new())
            .await
            .unwrap();

        assert!(answer.provider.is_none());
        assert!(answer.fallback_reason.as_deref().unwrap().contains("GEMINI_API_KEY"));
        assert!(answer.markdown.contains("Food Service License"));
        assert!(answer.markdown.contains("- Built-in License Guidance"));
        assert_eq!(answer.business_type, BusinessType::FoodHospitality);
    }

    #[tokio::test]
    async fn test_detects_state_by_nickname() {
        let navigator = LicenseNavigator::new(keyword_registry(), NavigatorSettings::default());
        let answer = navigator
            .ask("payday loans in the Sunshine State", &ConversationHistory::new())
            .await
            .unwrap();
        assert_eq!(answer.jurisdiction_code, "FL");
        assert_eq!(answer.jurisdiction_name, "Florida");
        assert!(answer.markdown.contains("- Florida Division of Corporations"));
    }

    #[tokio::test]
    async fn test_undetected_state_uses_default() {
        let mut settings = NavigatorSettings::default();
        settings.default_state = "FL".to_string();
        let navigator = LicenseNavigator::new(keyword_registry(), settings);

        let answer = navigator
            .ask("I am under contract to sell food", &ConversationHistory::new())
            .await
            .unwrap();
        assert_eq!(answer.jurisdiction_code, "FL");
    }

    #[tokio::test]
    async fn test_disabled_default_state_uses_generic() {
        let mut settings = NavigatorSettings::default();
        settings.default_state = "TX".to_string();
        let navigator = LicenseNavigator::new(keyword_registry(), settings);

        let answer = navigator
            .ask("tax help", &ConversationHistory::new())
            .await
            .unwrap();
        assert_eq!(answer.jurisdiction_code, "GENERIC");
        assert!(answer.markdown.contains("**General Business License Information**"));
    }

    #[tokio::test]
    async fn test_no_guide_is_an_error() {
        let navigator =
            LicenseNavigator::new(Arc::new(GuideRegistry::new()), NavigatorSettings::default());
        let err = navigator
            .ask("bakery", &ConversationHistory::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NavigatorError::NoGuide(code) if code == "DE"));
    }

    #[tokio::test]
    async fn test_llm_answer_with_vector_hits_is_attributed() {
        let provider = FakeProvider::replying("### Consumer Credit\nApply online.");
        let prompts = provider.prompts();
        let navigator =
            LicenseNavigator::new(registry_with_vectors().await, NavigatorSettings::default())
                .with_provider(Arc::new(BoxLlmProvider::new(provider)));

        let answer = navigator
            .ask("payday loans in Delaware", &ConversationHistory::new())
            .await
            .unwrap();

        assert_eq!(answer.provider, Some(ProviderType::Gemini));
        assert_eq!(answer.method, SearchMethod::Vector);
        assert!(answer.rag_used);
        assert!(answer.fallback_reason.is_none());
        assert!(answer.markdown.contains("Apply online."));
        assert!(answer.markdown.contains("- Google Gemini AI"));
        assert!(answer.markdown.contains("- Vector Database (RAG)"));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("payday loans in Delaware"));
        assert!(prompts[0].contains("Consumer Credit License"));
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let navigator = LicenseNavigator::new(keyword_registry(), NavigatorSettings::default())
            .with_provider(Arc::new(BoxLlmProvider::new(FakeProvider::failing(
                "connection refused",
            ))));

        let answer = navigator
            .ask("general contractor in DE", &ConversationHistory::new())
            .await
            .unwrap();

        assert!(answer.provider.is_none());
        assert!(!answer.rag_used);
        assert!(answer.fallback_reason.unwrap().contains("connection refused"));
        assert!(answer.markdown.contains("General Contractor License"));
        assert!(!answer.markdown.contains("Local Ollama AI"));
    }

    #[tokio::test]
    async fn test_conversation_context_reaches_prompt() {
        let provider = FakeProvider::replying("ok");
        let prompts = provider.prompts();
        let navigator = Arc::new(
            LicenseNavigator::new(keyword_registry(), NavigatorSettings::default())
                .with_provider(Arc::new(BoxLlmProvider::new(provider))),
        );
        let mut conversation = Conversation::new(navigator);

        conversation.ask("bakery in Delaware").await.unwrap();
        conversation.ask("what about a food truck?").await.unwrap();
        assert_eq!(conversation.history().len(), 2);

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[0].contains("User: bakery in Delaware"));
        assert!(prompts[1].contains("User: bakery in Delaware"));
    }

    #[tokio::test]
    async fn test_conversation_context_can_be_disabled() {
        let provider = FakeProvider::replying("ok");
        let prompts = provider.prompts();
        let mut settings = NavigatorSettings::default();
        settings.conversation_context = false;
        let navigator = Arc::new(
            LicenseNavigator::new(keyword_registry(), settings)
                .with_provider(Arc::new(BoxLlmProvider::new(provider))),
        );
        let mut conversation = Conversation::new(navigator);

        conversation.ask("bakery in Delaware").await.unwrap();
        conversation.ask("what about a food truck?").await.unwrap();

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[1].contains("User: bakery in Delaware"));
    }

    #[tokio::test]
    async fn test_clear_resets_history() {
        let navigator = Arc::new(LicenseNavigator::new(
            keyword_registry(),
            NavigatorSettings::default(),
        ));
        let mut conversation = Conversation::new(navigator);
        conversation.ask("bakery").await.unwrap();
        conversation.clear();
        assert!(conversation.history().is_empty());
    }
}
