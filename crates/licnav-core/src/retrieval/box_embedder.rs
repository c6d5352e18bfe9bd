//! Type-erased [`Embedder`] used by the similarity lookup.
//!
//! `Embedder` uses RPITIT, so it is not object-safe. `EmbedderDyn` boxes the
//! future and is blanket-implemented for every `Embedder`; `BoxEmbedder` holds
//! one behind a `Box<dyn EmbedderDyn>` and adds the record/query helpers the
//! lookup needs, with shape checks on what the model returns.

use std::future::Future;
use std::pin::Pin;

use licnav_types::error::RetrievalError;
use licnav_types::license::LicenseRecord;

use super::embedder::Embedder;

type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RetrievalError>> + Send + 'a>>;

pub trait EmbedderDyn: Send + Sync {
    fn embed_dyn<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a>;
    fn model_name_dyn(&self) -> &str;
    fn dimension_dyn(&self) -> usize;
}

impl<T: Embedder> EmbedderDyn for T {
    fn embed_dyn<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a> {
        Box::pin(self.embed(texts))
    }

    fn model_name_dyn(&self) -> &str {
        self.model_name()
    }

    fn dimension_dyn(&self) -> usize {
        self.dimension()
    }
}

pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn>,
}

impl BoxEmbedder {
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    pub fn model_name(&self) -> &str {
        self.inner.model_name_dyn()
    }

    pub fn dimension(&self) -> usize {
        self.inner.dimension_dyn()
    }

    /// One vector per record, in record order, from each record's searchable text.
    pub async fn embed_records(
        &self,
        records: &[LicenseRecord],
    ) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = records.iter().map(LicenseRecord::searchable_text).collect();
        let vectors = self.inner.embed_dyn(&texts).await?;
        if vectors.len() != records.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} vectors, got {}",
                records.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }
        Ok(vectors)
    }

    /// The vector for a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RetrievalError> {
        let texts = [query.to_string()];
        let vector = self
            .inner
            .embed_dyn(&texts)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("no vector returned for query".to_string()))?;
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), RetrievalError> {
        let expected = self.dimension();
        if vector.len() != expected {
            return Err(RetrievalError::Embedding(format!(
                "{} returned a {}-dimensional vector, expected {expected}",
                self.model_name(),
                vector.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_profile;

    /// Returns vectors of a fixed length regardless of the model's stated dimension.
    struct Lying {
        len: usize,
    }

    impl Embedder for Lying {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts.iter().map(|_| vec![0.5; self.len]).collect())
        }

        fn model_name(&self) -> &str {
            "lying"
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    #[tokio::test]
    async fn embed_records_returns_one_vector_per_record() {
        let records = sample_profile().records;
        let embedder = BoxEmbedder::new(Lying { len: 4 });
        let vectors = embedder.embed_records(&records).await.unwrap();
        assert_eq!(vectors.len(), records.len());
    }

    #[tokio::test]
    async fn embed_records_of_nothing_skips_the_model() {
        let embedder = BoxEmbedder::new(Lying { len: 1 });
        assert!(embedder.embed_records(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_dimension_is_an_embedding_error() {
        let embedder = BoxEmbedder::new(Lying { len: 3 });
        let err = embedder.embed_query("bakery").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
        assert!(err.to_string().contains("expected 4"));
    }
}
