//! Registry of loaded jurisdiction guides.

use licnav_types::jurisdiction::{GuideInfo, JurisdictionProfile};

use super::box_guide::BoxLicenseGuide;

/// Maps jurisdiction codes to guides, keeping registration order.
///
/// Unknown or disabled codes resolve to the generic guide.
#[derive(Default)]
pub struct GuideRegistry {
    guides: Vec<BoxLicenseGuide>,
    generic: Option<BoxLicenseGuide>,
}

impl GuideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guide, replacing any guide already registered under the same code.
    pub fn register(&mut self, guide: BoxLicenseGuide) {
        if guide.profile().is_generic() {
            self.generic = Some(guide);
            return;
        }
        self.guides
            .retain(|g| !g.code().eq_ignore_ascii_case(guide.code()));
        self.guides.push(guide);
    }

    /// The state guide registered under `code` (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&BoxLicenseGuide> {
        if code.eq_ignore_ascii_case(licnav_types::jurisdiction::GENERIC_CODE) {
            return self.generic.as_ref();
        }
        self.guides.iter().find(|g| g.code().eq_ignore_ascii_case(code))
    }

    /// The guide for `code`, or the generic guide.
    pub fn get_or_generic(&self, code: &str) -> Option<&BoxLicenseGuide> {
        self.get(code).or(self.generic.as_ref())
    }

    pub fn generic(&self) -> Option<&BoxLicenseGuide> {
        self.generic.as_ref()
    }

    /// State guides in registration order, generic excluded.
    pub fn states(&self) -> impl Iterator<Item = &BoxLicenseGuide> {
        self.guides.iter()
    }

    /// Every guide, generic last.
    pub fn all(&self) -> impl Iterator<Item = &BoxLicenseGuide> {
        self.guides.iter().chain(self.generic.iter())
    }

    /// State profiles in registration order, for detection.
    pub fn profiles(&self) -> impl Iterator<Item = &JurisdictionProfile> {
        self.guides.iter().map(BoxLicenseGuide::profile)
    }

    pub fn infos(&self) -> Vec<GuideInfo> {
        self.all().map(BoxLicenseGuide::info).collect()
    }

    pub fn len(&self) -> usize {
        self.guides.len() + usize::from(self.generic.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
