//! Vector index trait.
//!
//! One collection per jurisdiction. Collections are rebuilt wholesale, never
//! updated piecemeal, and carry the fingerprint of the corpus they were built
//! from. Implementations (LanceDB) live in licnav-infra.

use licnav_types::error::RetrievalError;
use licnav_types::license::{IndexMatch, IndexPoint};

/// Trait for a nearest-neighbour index over license record embeddings.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait VectorIndex: Send + Sync {
    /// Drop `collection` (if present), recreate it, and insert `points`
    /// tagged with `fingerprint`.
    ///
    /// Returns the number of points written.
    fn rebuild(
        &self,
        collection: &str,
        fingerprint: &str,
        points: &[IndexPoint],
    ) -> impl std::future::Future<Output = Result<usize, RetrievalError>> + Send;

    /// Return up to `limit` nearest points by cosine similarity, best first.
    fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<IndexMatch>, RetrievalError>> + Send;

    /// Number of points in `collection`. A missing collection counts as zero.
    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<usize, RetrievalError>> + Send;

    /// Fingerprint passed to the last `rebuild`, or `None` when the
    /// collection is missing or empty.
    fn fingerprint(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RetrievalError>> + Send;
}
