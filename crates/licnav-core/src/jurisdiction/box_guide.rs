//! BoxLicenseGuide -- object-safe dynamic dispatch wrapper for LicenseGuide.

use std::future::Future;
use std::pin::Pin;

use licnav_types::error::RetrievalError;
use licnav_types::jurisdiction::{GuideInfo, JurisdictionProfile};

use super::guide::LicenseGuide;
use crate::retrieval::lookup::LookupResult;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`LicenseGuide`] with boxed futures.
pub trait LicenseGuideDyn: Send + Sync {
    fn info(&self) -> GuideInfo;

    fn profile(&self) -> &JurisdictionProfile;

    fn index_boxed(&self) -> BoxFuture<'_, Result<usize, RetrievalError>>;

    fn ensure_indexed_boxed(&self) -> BoxFuture<'_, usize>;

    fn lookup_boxed<'a>(&'a self, query: &'a str, top_k: usize) -> BoxFuture<'a, LookupResult>;

    fn find_similar_boxed<'a>(
        &'a self,
        license_type: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, LookupResult>;

    fn search_licenses_boxed<'a>(&'a self, query: &'a str, top_k: usize) -> BoxFuture<'a, String>;

    fn similar_licenses_boxed<'a>(
        &'a self,
        license_type: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, String>;

    fn business_steps(&self) -> String;

    fn license_categories(&self) -> Vec<String>;

    fn resources(&self, category: Option<&str>) -> String;
}

impl<T: LicenseGuide> LicenseGuideDyn for T {
    fn info(&self) -> GuideInfo {
        LicenseGuide::info(self)
    }

    fn profile(&self) -> &JurisdictionProfile {
        LicenseGuide::profile(self)
    }

    fn index_boxed(&self) -> BoxFuture<'_, Result<usize, RetrievalError>> {
        Box::pin(self.index())
    }

    fn ensure_indexed_boxed(&self) -> BoxFuture<'_, usize> {
        Box::pin(self.ensure_indexed())
    }

    fn lookup_boxed<'a>(&'a self, query: &'a str, top_k: usize) -> BoxFuture<'a, LookupResult> {
        Box::pin(self.lookup(query, top_k))
    }

    fn find_similar_boxed<'a>(
        &'a self,
        license_type: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, LookupResult> {
        Box::pin(self.find_similar(license_type, top_k))
    }

    fn search_licenses_boxed<'a>(&'a self, query: &'a str, top_k: usize) -> BoxFuture<'a, String> {
        Box::pin(self.search_licenses(query, top_k))
    }

    fn similar_licenses_boxed<'a>(
        &'a self,
        license_type: &'a str,
        top_k: usize,
    ) -> BoxFuture<'a, String> {
        Box::pin(self.similar_licenses(license_type, top_k))
    }

    fn business_steps(&self) -> String {
        LicenseGuide::business_steps(self)
    }

    fn license_categories(&self) -> Vec<String> {
        LicenseGuide::license_categories(self)
    }

    fn resources(&self, category: Option<&str>) -> String {
        LicenseGuide::resources(self, category)
    }
}

/// Type-erased license guide.
pub struct BoxLicenseGuide {
    inner: Box<dyn LicenseGuideDyn + Send + Sync>,
}

impl BoxLicenseGuide {
    pub fn new<T: LicenseGuide + 'static>(guide: T) -> Self {
        Self {
            inner: Box::new(guide),
        }
    }

    pub fn info(&self) -> GuideInfo {
        self.inner.info()
    }

    pub fn profile(&self) -> &JurisdictionProfile {
        self.inner.profile()
    }

    pub fn code(&self) -> &str {
        &self.inner.profile().code
    }

    pub fn name(&self) -> &str {
        &self.inner.profile().name
    }

    pub async fn index(&self) -> Result<usize, RetrievalError> {
        self.inner.index_boxed().await
    }

    pub async fn ensure_indexed(&self) -> usize {
        self.inner.ensure_indexed_boxed().await
    }

    pub async fn lookup(&self, query: &str, top_k: usize) -> LookupResult {
        self.inner.lookup_boxed(query, top_k).await
    }

    pub async fn find_similar(&self, license_type: &str, top_k: usize) -> LookupResult {
        self.inner.find_similar_boxed(license_type, top_k).await
    }

    pub async fn search_licenses(&self, query: &str, top_k: usize) -> String {
        self.inner.search_licenses_boxed(query, top_k).await
    }

    pub async fn similar_licenses(&self, license_type: &str, top_k: usize) -> String {
        self.inner.similar_licenses_boxed(license_type, top_k).await
    }

    pub fn business_steps(&self) -> String {
        self.inner.business_steps()
    }

    pub fn license_categories(&self) -> Vec<String> {
        self.inner.license_categories()
    }

    pub fn resources(&self, category: Option<&str>) -> String {
        self.inner.resources(category)
    }
}
