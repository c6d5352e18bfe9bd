//! Vector database infrastructure for license record embeddings.
//!
//! Provides LanceDB collection management, the [`index::LanceLicenseIndex`]
//! implementation of `VectorIndex`, and fastembed-based local embedding
//! generation. Arrow schemas define the table structure.

pub mod embedder;
pub mod index;
pub mod lance;
pub mod schema;
