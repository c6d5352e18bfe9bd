//! BoxVectorIndex -- object-safe dynamic dispatch wrapper for VectorIndex.

use std::future::Future;
use std::pin::Pin;

use licnav_types::error::RetrievalError;
use licnav_types::license::{IndexMatch, IndexPoint};

use super::index::VectorIndex;

/// Object-safe version of [`VectorIndex`] with boxed futures.
pub trait VectorIndexDyn: Send + Sync {
    fn rebuild_boxed<'a>(
        &'a self,
        collection: &'a str,
        fingerprint: &'a str,
        points: &'a [IndexPoint],
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        collection: &'a str,
        query: &'a [f32],
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexMatch>, RetrievalError>> + Send + 'a>>;

    fn count_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>>;

    fn fingerprint_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RetrievalError>> + Send + 'a>>;
}

impl<T: VectorIndex> VectorIndexDyn for T {
    fn rebuild_boxed<'a>(
        &'a self,
        collection: &'a str,
        fingerprint: &'a str,
        points: &'a [IndexPoint],
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>> {
        Box::pin(self.rebuild(collection, fingerprint, points))
    }

    fn search_boxed<'a>(
        &'a self,
        collection: &'a str,
        query: &'a [f32],
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexMatch>, RetrievalError>> + Send + 'a>> {
        Box::pin(self.search(collection, query, limit))
    }

    fn count_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<usize, RetrievalError>> + Send + 'a>> {
        Box::pin(self.count(collection))
    }

    fn fingerprint_boxed<'a>(
        &'a self,
        collection: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RetrievalError>> + Send + 'a>> {
        Box::pin(self.fingerprint(collection))
    }
}

/// Type-erased vector index.
pub struct BoxVectorIndex {
    inner: Box<dyn VectorIndexDyn + Send + Sync>,
}

impl BoxVectorIndex {
    pub fn new<T: VectorIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    pub async fn rebuild(
        &self,
        collection: &str,
        fingerprint: &str,
        points: &[IndexPoint],
    ) -> Result<usize, RetrievalError> {
        self.inner.rebuild_boxed(collection, fingerprint, points).await
    }

    pub async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<IndexMatch>, RetrievalError> {
        self.inner.search_boxed(collection, query, limit).await
    }

    pub async fn count(&self, collection: &str) -> Result<usize, RetrievalError> {
        self.inner.count_boxed(collection).await
    }

    pub async fn fingerprint(&self, collection: &str) -> Result<Option<String>, RetrievalError> {
        self.inner.fingerprint_boxed(collection).await
    }
}
