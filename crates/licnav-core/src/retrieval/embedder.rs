//! Text embedding port.

use std::future::Future;

use licnav_types::error::RetrievalError;

/// Turns license text and user queries into dense vectors.
///
/// The infra crate implements this over a local ONNX model; tests use a
/// bag-of-words fake. Records and queries go through the same model, so
/// their vectors are comparable by cosine similarity.
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order, each `dimension()` long.
    fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send;

    /// Model identifier, used in logs and error messages.
    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;
}
