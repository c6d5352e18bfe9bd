//! License record retrieval.
//!
//! - `Embedder` / `BoxEmbedder`: text-to-vector conversion
//! - `VectorIndex` / `BoxVectorIndex`: nearest-neighbour collections
//! - `SimilarityLookup`: vector search with keyword fallback, per jurisdiction

pub mod box_embedder;
pub mod box_index;
pub mod embedder;
pub mod index;
pub mod keyword;
pub mod lookup;
