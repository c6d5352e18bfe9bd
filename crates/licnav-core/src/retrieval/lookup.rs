//! Per-jurisdiction similarity lookup.
//!
//! Embeds the query and asks the vector index for its nearest neighbours.
//! Any embedder or index failure is logged and converted into the keyword
//! fallback path, so a lookup always produces a result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use licnav_types::error::RetrievalError;
use licnav_types::license::{IndexPoint, LicenseRecord, SearchHit, SearchMethod};

use super::box_embedder::BoxEmbedder;
use super::box_index::BoxVectorIndex;
use super::keyword::keyword_search;

/// Text returned when a lookup has no hits.
pub const NO_INFORMATION: &str = "No information found";

/// Name of the index collection holding a jurisdiction's records.
pub fn collection_name(code: &str) -> String {
    let slug: String = code
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("licenses_{slug}")
}

/// SHA-256 over everything a collection's contents depend on: the embedding
/// model, its dimension, and every record's payload in order.
pub fn corpus_fingerprint(model: &str, dimension: usize, records: &[LicenseRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    hasher.update((dimension as u64).to_le_bytes());
    for record in records {
        for field in [
            &record.id,
            &record.title,
            &record.text,
            &record.category,
            &record.source_url,
        ] {
            // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Hits plus the path that produced them.
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub hits: Vec<SearchHit>,
    pub method: SearchMethod,
}

impl LookupResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Similarity lookup over one jurisdiction's fixed record list.
pub struct SimilarityLookup {
    collection: String,
    records: Vec<LicenseRecord>,
    embedder: Option<Arc<BoxEmbedder>>,
    index: Option<Arc<BoxVectorIndex>>,
    threshold: f32,
    vector_ready: AtomicBool,
}

impl SimilarityLookup {
    /// Create a lookup. Without an embedder and an index it serves keyword results only.
    pub fn new(
        collection: impl Into<String>,
        records: Vec<LicenseRecord>,
        embedder: Option<Arc<BoxEmbedder>>,
        index: Option<Arc<BoxVectorIndex>>,
    ) -> Self {
        Self {
            collection: collection.into(),
            records,
            embedder,
            index,
            threshold: 0.0,
            vector_ready: AtomicBool::new(false),
        }
    }

    /// Drop vector hits scoring below `threshold`. Zero or less disables the filter.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn records(&self) -> &[LicenseRecord] {
        &self.records
    }

    /// Whether searches currently go through the vector index.
    pub fn vector_available(&self) -> bool {
        self.embedder.is_some() && self.index.is_some() && self.vector_ready.load(Ordering::Acquire)
    }

    /// Embed every record in one batch and rebuild the collection.
    ///
    /// On failure the lookup is marked unavailable and serves keyword results.
    pub async fn index(&self) -> Result<usize, RetrievalError> {
        let result = self.rebuild().await;
        self.vector_ready.store(result.is_ok(), Ordering::Release);
        result
    }

    async fn rebuild(&self) -> Result<usize, RetrievalError> {
        let (Some(embedder), Some(index)) = (&self.embedder, &self.index) else {
            return Err(RetrievalError::Unavailable);
        };

        let fingerprint = corpus_fingerprint(embedder.model_name(), embedder.dimension(), &self.records);
        let vectors = embedder.embed_records(&self.records).await?;

        let points: Vec<IndexPoint> = self
            .records
            .iter()
            .zip(vectors)
            .map(|(record, vector)| IndexPoint {
                id: record.id.clone(),
                title: record.title.clone(),
                category: record.category.clone(),
                source_url: record.source_url.clone(),
                text: record.text.clone(),
                vector,
            })
            .collect();

        index.rebuild(&self.collection, &fingerprint, &points).await
    }

    /// Reuse an existing collection built from this exact corpus and model,
    /// otherwise index.
    ///
    /// Never fails: indexing errors leave the lookup on the keyword path.
    pub async fn ensure_indexed(&self) -> usize {
        let (Some(embedder), Some(index)) = (&self.embedder, &self.index) else {
            return 0;
        };

        if !self.records.is_empty() {
            let expected = corpus_fingerprint(embedder.model_name(), embedder.dimension(), &self.records);
            match self.stored_state(index).await {
                Ok((Some(stored), count)) if stored == expected && count == self.records.len() => {
                    debug!(collection = %self.collection, count, "reusing existing vector collection");
                    self.vector_ready.store(true, Ordering::Release);
                    return count;
                }
                Ok((stored, count)) => {
                    debug!(
                        collection = %self.collection,
                        count,
                        expected = self.records.len(),
                        fingerprint_matches = stored.as_deref() == Some(expected.as_str()),
                        "vector collection out of date"
                    );
                }
                Err(e) => {
                    warn!(collection = %self.collection, error = %e, "failed to inspect vector collection");
                }
            }
        }

        match self.index().await {
            Ok(count) => {
                info!(collection = %self.collection, count, "indexed license records");
                count
            }
            Err(e) => {
                warn!(
                    collection = %self.collection,
                    error = %e,
                    "vector indexing failed, serving keyword results"
                );
                0
            }
        }
    }

    async fn stored_state(&self, index: &BoxVectorIndex) -> Result<(Option<String>, usize), RetrievalError> {
        let fingerprint = index.fingerprint(&self.collection).await?;
        let count = index.count(&self.collection).await?;
        Ok((fingerprint, count))
    }

    /// Return up to `k` hits for `query`.
    ///
    /// The vector path returns real similarities; the keyword path returns
    /// every substring match with score 1.0.
    pub async fn search(&self, query: &str, k: usize) -> LookupResult {
        if self.vector_available() {
            match self.vector_search(query, k).await {
                Ok(hits) => {
                    debug!(collection = %self.collection, hits = hits.len(), "vector search");
                    return LookupResult {
                        hits,
                        method: SearchMethod::Vector,
                    };
                }
                Err(e) => {
                    warn!(
                        collection = %self.collection,
                        error = %e,
                        "vector search failed, falling back to keyword search"
                    );
                }
            }
        }

        let hits = keyword_search(&self.records, query);
        debug!(collection = %self.collection, hits = hits.len(), "keyword search");
        LookupResult {
            hits,
            method: SearchMethod::Keyword,
        }
    }

    async fn vector_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let (Some(embedder), Some(index)) = (&self.embedder, &self.index) else {
            return Err(RetrievalError::Unavailable);
        };

        let vector = embedder.embed_query(query).await?;
        let matches = index.search(&self.collection, &vector, k).await?;

        let hits = matches
            .into_iter()
            .filter(|m| self.threshold <= 0.0 || m.score >= self.threshold)
            .filter_map(|m| {
                let record = self.records.iter().find(|r| r.id == m.id);
                if record.is_none() {
                    debug!(collection = %self.collection, id = %m.id, "index returned unknown record id");
                }
                record.map(|r| SearchHit {
                    record: r.clone(),
                    score: m.score,
                })
            })
            .collect();
        Ok(hits)
    }
}

/// Format hits as markdown, or [`NO_INFORMATION`] when empty.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_INFORMATION.to_string();
    }

    hits.iter()
        .map(|hit| {
            format!(
                "**{}** (score: {:.3})\n{}\nSource: {}",
                hit.record.title, hit.score, hit.record.text, hit.record.source_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeEmbedder, FakeIndex, record};

    fn corpus() -> Vec<LicenseRecord> {
        vec![
            record("de-money", "Money Transmitter License", "money transfer and payment services", Some("Money Transmitter License")),
            record("de-credit", "Consumer Credit License", "consumer credit and payday loans", Some("Consumer Credit License")),
            record("de-tax", "Tax Registration", "sales tax and withholding tax", Some("Tax Registration")),
        ]
    }

    fn lookup(embedder: FakeEmbedder, index: FakeIndex) -> SimilarityLookup {
        SimilarityLookup::new(
            collection_name("DE"),
            corpus(),
            Some(Arc::new(BoxEmbedder::new(embedder))),
            Some(Arc::new(BoxVectorIndex::new(index))),
        )
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(collection_name("DE"), "licenses_de");
        assert_eq!(collection_name("GENERIC"), "licenses_generic");
        assert_eq!(collection_name("n-y"), "licenses_n_y");
    }

    #[tokio::test]
    async fn test_vector_path_after_indexing() {
        let lookup = lookup(FakeEmbedder::new(), FakeIndex::new());
        assert_eq!(lookup.index().await.unwrap(), 3);
        assert!(lookup.vector_available());

        let result = lookup.search("payday loans", 2).await;
        assert_eq!(result.method, SearchMethod::Vector);
        assert_eq!(result.hits.len(), 2);
        assert_eq!(result.hits[0].record.id, "de-credit");
        assert!(result.hits[0].score > result.hits[1].score);
        assert!(result.hits[0].score <= 1.0);
    }

    #[tokio::test]
    async fn test_keyword_path_without_backends() {
        let lookup = SimilarityLookup::new("licenses_de", corpus(), None, None);
        assert_eq!(lookup.ensure_indexed().await, 0);
        assert!(!lookup.vector_available());

        let result = lookup.search("TAX", 5).await;
        assert_eq!(result.method, SearchMethod::Keyword);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_embedder_failure_falls_back_to_keyword() {
        let lookup = lookup(FakeEmbedder::failing(), FakeIndex::new());
        assert_eq!(lookup.ensure_indexed().await, 0);
        assert!(!lookup.vector_available());

        let result = lookup.search("payday", 5).await;
        assert_eq!(result.method, SearchMethod::Keyword);
        assert_eq!(result.hits[0].record.id, "de-credit");
    }

    #[tokio::test]
    async fn test_index_search_failure_falls_back_to_keyword() {
        let index = FakeIndex::new();
        let failing = index.failing_handle();
        let lookup = lookup(FakeEmbedder::new(), index);
        lookup.index().await.unwrap();

        failing.store(true, Ordering::SeqCst);
        let result = lookup.search("money", 5).await;
        assert_eq!(result.method, SearchMethod::Keyword);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].record.id, "de-money");
    }

    #[tokio::test]
    async fn test_ensure_indexed_reuses_matching_collection() {
        let index = FakeIndex::new();
        let rebuilds = index.rebuild_counter();
        let lookup = lookup(FakeEmbedder::new(), index);

        assert_eq!(lookup.ensure_indexed().await, 3);
        assert_eq!(lookup.ensure_indexed().await, 3);
        assert_eq!(rebuilds.load(Ordering::SeqCst), 1);
        assert!(lookup.vector_available());
    }

    #[tokio::test]
    async fn test_ensure_indexed_rebuilds_when_record_swapped() {
        let index = Arc::new(BoxVectorIndex::new(FakeIndex::new()));
        let embedder = Arc::new(BoxEmbedder::new(FakeEmbedder::new()));

        let before = SimilarityLookup::new(
            collection_name("DE"),
            vec![
                record("old-a", "Money License", "money payment", None),
                record("old-b", "Tax License", "sales tax", None),
            ],
            Some(Arc::clone(&embedder)),
            Some(Arc::clone(&index)),
        );
        assert_eq!(before.ensure_indexed().await, 2);

        // Same collection, same size, one record replaced.
        let after = SimilarityLookup::new(
            collection_name("DE"),
            vec![
                record("old-a", "Money License", "money payment", None),
                record("new-c", "Food Service License", "restaurant food", None),
            ],
            Some(embedder),
            Some(index),
        );
        assert_eq!(after.ensure_indexed().await, 2);

        let result = after.search("restaurant food", 1).await;
        assert_eq!(result.method, SearchMethod::Vector);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].record.id, "new-c");
    }

    #[tokio::test]
    async fn test_ensure_indexed_rebuilds_when_model_changes() {
        let fake = FakeIndex::new();
        let rebuilds = fake.rebuild_counter();
        let index = Arc::new(BoxVectorIndex::new(fake));

        let first = SimilarityLookup::new(
            collection_name("DE"),
            corpus(),
            Some(Arc::new(BoxEmbedder::new(FakeEmbedder::new()))),
            Some(Arc::clone(&index)),
        );
        first.ensure_indexed().await;

        let second = SimilarityLookup::new(
            collection_name("DE"),
            corpus(),
            Some(Arc::new(BoxEmbedder::new(FakeEmbedder::named("fake-bow-v2")))),
            Some(index),
        );
        assert_eq!(second.ensure_indexed().await, 3);
        assert_eq!(rebuilds.load(Ordering::SeqCst), 2);
        assert!(second.vector_available());
    }

    #[test]
    fn test_corpus_fingerprint_tracks_model_and_records() {
        let records = corpus();
        let base = corpus_fingerprint("bge-small", 384, &records);
        assert_eq!(base, corpus_fingerprint("bge-small", 384, &corpus()));
        assert_ne!(base, corpus_fingerprint("bge-base", 384, &records));
        assert_ne!(base, corpus_fingerprint("bge-small", 768, &records));

        let mut edited = corpus();
        edited[1].text.push_str(" and title loans");
        assert_ne!(base, corpus_fingerprint("bge-small", 384, &edited));

        let mut reordered = corpus();
        reordered.swap(0, 1);
        assert_ne!(base, corpus_fingerprint("bge-small", 384, &reordered));
    }

    #[tokio::test]
    async fn test_threshold_drops_weak_hits() {
        let lookup = lookup(FakeEmbedder::new(), FakeIndex::new()).with_threshold(0.5);
        lookup.index().await.unwrap();

        let result = lookup.search("payday loans", 3).await;
        assert_eq!(result.method, SearchMethod::Vector);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].record.id, "de-credit");
        assert!(result.hits[0].score >= 0.5);
    }

    #[test]
    fn test_format_hits() {
        assert_eq!(format_hits(&[]), NO_INFORMATION);

        let hits = vec![SearchHit {
            record: corpus().remove(0),
            score: 0.8765,
        }];
        let text = format_hits(&hits);
        assert!(text.starts_with("**Money Transmitter License** (score: 0.877)"));
        assert!(text.contains("Source: https://"));
    }
}
