//! Application state wiring all services together.
//!
//! AppState holds the navigator and guide registry used by both CLI and REST
//! API. The core types are generic over embedder/index/provider traits;
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use licnav_core::jurisdiction::box_guide::BoxLicenseGuide;
use licnav_core::jurisdiction::profile_guide::ProfileGuide;
use licnav_core::jurisdiction::registry::GuideRegistry;
use licnav_core::navigator::{LicenseNavigator, NavigatorSettings};
use licnav_core::retrieval::box_embedder::BoxEmbedder;
use licnav_core::retrieval::box_index::BoxVectorIndex;
use licnav_infra::config::{load_app_config, resolve_index_dir};
use licnav_infra::jurisdiction::{ProfileStore, enabled_profiles};
use licnav_infra::llm::create_provider;
use licnav_infra::vector::embedder::FastEmbedder;
use licnav_infra::vector::index::LanceLicenseIndex;
use licnav_infra::vector::lance::LanceVectorStore;
use licnav_types::config::AppConfig;

use crate::http::metrics::ServiceMetrics;
use crate::http::sessions::SessionStore;

/// Whether to load the embedding model and vector index.
///
/// Loading the model is slow on first use, so commands that only read
/// profile data (steps, categories, resources) skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    Vector,
    KeywordOnly,
}

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<AppConfig>,
    pub navigator: Arc<LicenseNavigator>,
    /// Conversation history per HTTP session id.
    pub sessions: Arc<SessionStore>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Load config, build the guide registry, and connect the LLM provider.
    pub async fn init(data_dir: PathBuf, retrieval: Retrieval) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_app_config(&data_dir).await;
        let registry = build_registry(&data_dir, &config, retrieval).await?;

        if retrieval == Retrieval::Vector {
            for guide in registry.all() {
                let indexed = guide.ensure_indexed().await;
                tracing::debug!(code = guide.code(), indexed, "guide ready");
            }
        }

        let navigator = build_navigator(Arc::new(registry), &config);
        let sessions = SessionStore::from_config(&config.server);

        Ok(Self {
            data_dir,
            config: Arc::new(config),
            navigator: Arc::new(navigator),
            sessions: Arc::new(sessions),
            metrics: Arc::new(ServiceMetrics::new()),
        })
    }

    pub fn registry(&self) -> &GuideRegistry {
        self.navigator.registry()
    }

    /// Guide for `--state`, or for the configured default state.
    ///
    /// Unknown or disabled codes resolve to the generic guide.
    pub fn guide(&self, state: Option<&str>) -> anyhow::Result<&BoxLicenseGuide> {
        let code = state.unwrap_or(&self.config.default_state);
        let guide = self
            .registry()
            .get_or_generic(code)
            .with_context(|| format!("No guide available for '{code}'"))?;
        if !guide.code().eq_ignore_ascii_case(code) {
            tracing::info!(requested = code, "state not enabled, using the generic guide");
        }
        Ok(guide)
    }

    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(self.data_dir.clone())
    }
}

async fn build_registry(
    data_dir: &std::path::Path,
    config: &AppConfig,
    retrieval: Retrieval,
) -> anyhow::Result<GuideRegistry> {
    let store = ProfileStore::new(data_dir.to_path_buf());
    let profiles = enabled_profiles(&store, config).context("Failed to load jurisdiction profiles")?;

    let (embedder, index) = if retrieval == Retrieval::Vector && config.features.vector_search {
        open_vector_backend(data_dir, config).await
    } else {
        (None, None)
    };

    let mut registry = GuideRegistry::new();
    for profile in profiles {
        registry.register(BoxLicenseGuide::new(ProfileGuide::new(
            profile,
            embedder.clone(),
            index.clone(),
            config.retrieval.similarity_threshold,
        )));
    }
    Ok(registry)
}

/// Load the embedding model and open the LanceDB index.
///
/// Failure is not fatal: guides without a backend serve keyword results.
async fn open_vector_backend(
    data_dir: &std::path::Path,
    config: &AppConfig,
) -> (Option<Arc<BoxEmbedder>>, Option<Arc<BoxVectorIndex>>) {
    let model_name = config.retrieval.embedding_model.clone();
    let cache_dir = data_dir.join("models");
    let embedder =
        match tokio::task::spawn_blocking(move || FastEmbedder::new(&model_name, &cache_dir)).await {
            Ok(Ok(embedder)) => embedder,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Embedding model unavailable, using keyword search");
                return (None, None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Embedding model load task failed, using keyword search");
                return (None, None);
            }
        };

    let dimension = licnav_core::retrieval::embedder::Embedder::dimension(&embedder);
    if dimension != config.retrieval.vector_dimension {
        tracing::warn!(
            configured = config.retrieval.vector_dimension,
            model = dimension,
            "vector_dimension does not match the embedding model, using the model's"
        );
    }

    let index_dir = resolve_index_dir(data_dir, &config.retrieval);
    let store = match LanceVectorStore::new(index_dir.clone()).await {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(path = %index_dir.display(), error = %e, "Vector index unavailable, using keyword search");
            return (None, None);
        }
    };

    (
        Some(Arc::new(BoxEmbedder::new(embedder))),
        Some(Arc::new(BoxVectorIndex::new(LanceLicenseIndex::new(store, dimension)))),
    )
}

fn build_navigator(registry: Arc<GuideRegistry>, config: &AppConfig) -> LicenseNavigator {
    let navigator = LicenseNavigator::new(registry, NavigatorSettings::from_config(config));
    if !config.features.llm {
        return navigator.with_unavailable_provider("LLM disabled in config");
    }

    match create_provider(&config.llm) {
        Ok(Some(provider)) => {
            tracing::debug!(provider = provider.name(), "LLM provider ready");
            navigator.with_provider(Arc::new(provider))
        }
        Ok(None) => navigator.with_unavailable_provider("offline provider configured"),
        Err(e) => {
            tracing::warn!(error = %e, "LLM provider unavailable, answers use built-in guidance");
            navigator.with_unavailable_provider(e.to_string())
        }
    }
}
