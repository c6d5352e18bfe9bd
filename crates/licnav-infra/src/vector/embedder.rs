//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `licnav-core` using fastembed's ONNX
//! models (BGESmallENV15 by default, 384 dimensions). Inference is CPU-bound
//! and runs on the blocking pool behind a mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use licnav_core::retrieval::embedder::Embedder;
use licnav_types::error::RetrievalError;

/// Config names of the supported models, their fastembed variant, and output dimension.
const MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
    ("all-minilm-l6-v2", EmbeddingModel::AllMiniLML6V2, 384),
];

/// Look up a model by its config name (case-insensitive).
pub fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), RetrievalError> {
    MODELS
        .iter()
        .find(|(key, _, _)| key.eq_ignore_ascii_case(name.trim()))
        .map(|(_, model, dim)| (model.clone(), *dim))
        .ok_or_else(|| {
            let known: Vec<&str> = MODELS.iter().map(|(key, _, _)| *key).collect();
            RetrievalError::Embedding(format!(
                "unknown embedding model '{name}' (supported: {})",
                known.join(", ")
            ))
        })
}

pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load `model_name`, downloading it into `cache_dir` on first use.
    ///
    /// Blocking: call from `spawn_blocking` or before the runtime is busy.
    pub fn new(model_name: &str, cache_dir: &Path) -> Result<Self, RetrievalError> {
        let (model, dimension) = resolve_model(model_name)?;
        let options = InitOptions::new(model)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);
        let embedding = TextEmbedding::try_new(options)
            .map_err(|e| RetrievalError::Embedding(format!("failed to load {model_name}: {e}")))?;

        info!(model = model_name, dimension, "embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| RetrievalError::Embedding("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| RetrievalError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| RetrievalError::Embedding(format!("embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_model() {
        let (model, dimension) = resolve_model("bge-small-en-v1.5").unwrap();
        assert_eq!(model, EmbeddingModel::BGESmallENV15);
        assert_eq!(dimension, 384);
    }

    #[test]
    fn test_resolve_model_ignores_case() {
        let (_, dimension) = resolve_model(" BGE-Base-EN-v1.5 ").unwrap();
        assert_eq!(dimension, 768);
    }

    #[test]
    fn test_resolve_unknown_model_lists_supported() {
        let err = resolve_model("ada-002").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ada-002"));
        assert!(message.contains("bge-small-en-v1.5"));
    }
}
