//! Arrow schema for LanceDB license collections.
//!
//! Arrow versions MUST match lancedb's transitive dependency (57.3 for lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// Schema for one jurisdiction's collection (`licenses_{code}`).
///
/// Stores a payload copy of each record next to its embedding so search
/// results can be checked without the corpus. Every row carries the corpus
/// fingerprint the collection was built from.
pub fn license_schema(dimension: i32) -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("source_url", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("fingerprint", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimension,
            ),
            false,
        ),
    ])
}
