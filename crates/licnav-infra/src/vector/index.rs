//! LanceDB-backed [`VectorIndex`] for license records.
//!
//! One table per jurisdiction. `rebuild` drops and recreates the table, so a
//! collection always mirrors exactly one corpus snapshot, identified by the
//! fingerprint stored on every row. Searches use cosine
//! distance; scores are reported as `1 - distance`.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use tracing::debug;

use licnav_core::retrieval::index::VectorIndex;
use licnav_types::error::RetrievalError;
use licnav_types::license::{IndexMatch, IndexPoint};

use super::lance::LanceVectorStore;
use super::schema::license_schema;

/// LanceDB implementation of the license vector index.
pub struct LanceLicenseIndex {
    store: LanceVectorStore,
    dimension: i32,
}

impl LanceLicenseIndex {
    pub fn new(store: LanceVectorStore, dimension: usize) -> Self {
        Self {
            store,
            dimension: dimension as i32,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &LanceVectorStore {
        &self.store
    }

    fn build_record_batch(
        &self,
        fingerprint: &str,
        points: &[IndexPoint],
    ) -> Result<RecordBatch, RetrievalError> {
        let schema = Arc::new(license_schema(self.dimension));

        let mut flat: Vec<f32> = Vec::with_capacity(points.len() * self.dimension as usize);
        for point in points {
            if point.vector.len() != self.dimension as usize {
                return Err(RetrievalError::Index(format!(
                    "vector for '{}' has {} dimensions, expected {}",
                    point.id,
                    point.vector.len(),
                    self.dimension
                )));
            }
            flat.extend_from_slice(&point.vector);
        }

        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let vector_array =
            FixedSizeListArray::new(field, self.dimension, Arc::new(Float32Array::from(flat)), None);

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(string_column(points, |p| p.id.as_str())),
                Arc::new(string_column(points, |p| p.title.as_str())),
                Arc::new(string_column(points, |p| p.category.as_str())),
                Arc::new(string_column(points, |p| p.source_url.as_str())),
                Arc::new(string_column(points, |p| p.text.as_str())),
                Arc::new(string_column(points, |_| fingerprint)),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| RetrievalError::Index(format!("Failed to build record batch: {e}")))
    }
}

fn string_column<'a>(points: &'a [IndexPoint], f: impl Fn(&'a IndexPoint) -> &'a str) -> StringArray {
    StringArray::from(points.iter().map(|p| f(p).to_string()).collect::<Vec<_>>())
}

fn index_err(context: &str) -> impl FnOnce(lancedb::Error) -> RetrievalError + '_ {
    move |e| RetrievalError::Index(format!("{context}: {e}"))
}

impl VectorIndex for LanceLicenseIndex {
    async fn rebuild(
        &self,
        collection: &str,
        fingerprint: &str,
        points: &[IndexPoint],
    ) -> Result<usize, RetrievalError> {
        // Validate before touching the existing table.
        let batch = if points.is_empty() {
            None
        } else {
            Some(self.build_record_batch(fingerprint, points)?)
        };

        self.store
            .drop_table(collection)
            .await
            .map_err(index_err("Failed to drop collection"))?;
        let table = self
            .store
            .ensure_table(collection, Arc::new(license_schema(self.dimension)))
            .await
            .map_err(index_err("Failed to create collection"))?;

        let Some(batch) = batch else {
            return Ok(0);
        };
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(index_err("Failed to add points"))?;

        debug!(collection, count = points.len(), "collection rebuilt");
        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<IndexMatch>, RetrievalError> {
        let table = self
            .store
            .open_table(collection)
            .await
            .map_err(index_err("Failed to open collection"))?
            .ok_or_else(|| RetrievalError::Index(format!("collection {collection} not found")))?;

        let results = table
            .vector_search(query)
            .map_err(|e| RetrievalError::Query(format!("Vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| RetrievalError::Query(format!("Vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| RetrievalError::Query(format!("Failed to collect results: {e}")))?;

        let mut matches = Vec::new();
        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }
            let ids = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| RetrievalError::Query("id column missing from results".to_string()))?;
            // Added by LanceDB vector search.
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                if ids.is_null(i) {
                    continue;
                }
                let distance = distances.map_or(0.0, |d| d.value(i));
                matches.push(IndexMatch {
                    id: ids.value(i).to_string(),
                    score: 1.0 - distance,
                });
            }
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count(&self, collection: &str) -> Result<usize, RetrievalError> {
        let Some(table) = self
            .store
            .open_table(collection)
            .await
            .map_err(index_err("Failed to open collection"))?
        else {
            return Ok(0);
        };
        table
            .count_rows(None)
            .await
            .map_err(index_err("Failed to count rows"))
    }

    async fn fingerprint(&self, collection: &str) -> Result<Option<String>, RetrievalError> {
        let Some(table) = self
            .store
            .open_table(collection)
            .await
            .map_err(index_err("Failed to open collection"))?
        else {
            return Ok(None);
        };

        let batches: Vec<RecordBatch> = table
            .query()
            .limit(1)
            .execute()
            .await
            .map_err(|e| RetrievalError::Query(format!("Fingerprint query failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| RetrievalError::Query(format!("Failed to collect fingerprint: {e}")))?;

        // Collections written before fingerprints existed have no such column.
        let fingerprint = batches
            .iter()
            .filter(|batch| batch.num_rows() > 0)
            .find_map(|batch| batch.column_by_name("fingerprint"))
            .and_then(|column| column.as_any().downcast_ref::<StringArray>())
            .filter(|column| !column.is_null(0))
            .map(|column| column.value(0).to_string());
        Ok(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, vector: [f32; 4]) -> IndexPoint {
        IndexPoint {
            id: id.to_string(),
            title: format!("{id} title"),
            category: "Financial Services".to_string(),
            source_url: format!("https://example.gov/{id}"),
            text: format!("{id} text"),
            vector: vector.to_vec(),
        }
    }

    async fn index(dir: &tempfile::TempDir) -> LanceLicenseIndex {
        let store = LanceVectorStore::new(dir.path().to_path_buf())
            .await
            .expect("Failed to create vector store");
        LanceLicenseIndex::new(store, 4)
    }

    #[tokio::test]
    async fn test_missing_collection_counts_zero() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir).await;
        assert_eq!(index.count("licenses_de").await.unwrap(), 0);
        assert!(index.fingerprint("licenses_de").await.unwrap().is_none());
        assert!(index.search("licenses_de", &[1.0, 0.0, 0.0, 0.0], 3).await.is_err());
    }

    #[tokio::test]
    async fn test_rebuild_then_search_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir).await;
        let points = vec![
            point("de-money", [1.0, 0.0, 0.0, 0.0]),
            point("de-credit", [0.0, 1.0, 0.0, 0.0]),
            point("de-tax", [0.7, 0.7, 0.0, 0.0]),
        ];

        assert_eq!(index.rebuild("licenses_de", "fp-1", &points).await.unwrap(), 3);
        assert_eq!(index.count("licenses_de").await.unwrap(), 3);

        let matches = index
            .search("licenses_de", &[0.9, 0.1, 0.0, 0.0], 2)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "de-money");
        assert_eq!(matches[1].id, "de-tax");
        assert!(matches[0].score > matches[1].score);
        assert!(matches[0].score <= 1.0 + f32::EPSILON);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_collection() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir).await;
        index
            .rebuild(
                "licenses_fl",
                "fp-1",
                &[point("a", [1.0, 0.0, 0.0, 0.0]), point("b", [0.0, 1.0, 0.0, 0.0])],
            )
            .await
            .unwrap();
        index
            .rebuild("licenses_fl", "fp-2", &[point("c", [0.0, 0.0, 1.0, 0.0])])
            .await
            .unwrap();

        assert_eq!(index.count("licenses_fl").await.unwrap(), 1);
        assert_eq!(index.fingerprint("licenses_fl").await.unwrap().as_deref(), Some("fp-2"));
        let matches = index
            .search("licenses_fl", &[1.0, 0.0, 0.0, 0.0], 5)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "c");
    }

    #[tokio::test]
    async fn test_rebuild_rejects_wrong_dimension_and_keeps_old_data() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir).await;
        index
            .rebuild("licenses_de", "fp-1", &[point("a", [1.0, 0.0, 0.0, 0.0])])
            .await
            .unwrap();

        let mut bad = point("b", [1.0, 0.0, 0.0, 0.0]);
        bad.vector.push(0.5);
        let err = index.rebuild("licenses_de", "fp-2", &[bad]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Index(msg) if msg.contains("5 dimensions")));
        assert_eq!(index.count("licenses_de").await.unwrap(), 1);
        assert_eq!(index.fingerprint("licenses_de").await.unwrap().as_deref(), Some("fp-1"));
    }

    #[tokio::test]
    async fn test_rebuild_with_no_points_leaves_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(&dir).await;
        assert_eq!(index.rebuild("licenses_generic", "fp-1", &[]).await.unwrap(), 0);
        assert_eq!(index.count("licenses_generic").await.unwrap(), 0);
        assert!(index.fingerprint("licenses_generic").await.unwrap().is_none());
        assert!(index.store().table_exists("licenses_generic").await);
    }
}
