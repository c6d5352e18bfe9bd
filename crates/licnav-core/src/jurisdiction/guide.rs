//! LicenseGuide trait definition.
//!
//! One guide per jurisdiction. Every operation produces something usable:
//! retrieval failures degrade to keyword results and then to the
//! jurisdiction's general requirements.

use licnav_types::error::RetrievalError;
use licnav_types::jurisdiction::{GuideInfo, JurisdictionProfile};

use crate::retrieval::lookup::LookupResult;

/// Trait for jurisdiction license guides.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait LicenseGuide: Send + Sync {
    /// Code, name, record count, and whether vector search is active.
    fn info(&self) -> GuideInfo;

    fn profile(&self) -> &JurisdictionProfile;

    /// (Re)build the jurisdiction's vector collection.
    fn index(&self) -> impl std::future::Future<Output = Result<usize, RetrievalError>> + Send;

    /// Reuse an up-to-date collection or index. Never fails.
    fn ensure_indexed(&self) -> impl std::future::Future<Output = usize> + Send;

    /// Raw similarity lookup.
    fn lookup(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = LookupResult> + Send;

    /// Records most similar to `license_type`, never including that type itself.
    fn find_similar(
        &self,
        license_type: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = LookupResult> + Send;

    /// Search results rendered as text, with business-phrase and general fallbacks.
    fn search_licenses(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = String> + Send;

    /// [`LicenseGuide::find_similar`] rendered as text.
    fn similar_licenses(
        &self,
        license_type: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = String> + Send;

    /// Ordered start-a-business steps as markdown.
    fn business_steps(&self) -> String;

    /// Distinct record categories in corpus order.
    fn license_categories(&self) -> Vec<String>;

    /// Official resource links for one category, or all when `None`.
    fn resources(&self, category: Option<&str>) -> String;
}
