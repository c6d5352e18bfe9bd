//! Jurisdiction license guides.
//!
//! - `LicenseGuide` / `BoxLicenseGuide`: per-jurisdiction operations
//! - `ProfileGuide`: data-driven implementation over a `JurisdictionProfile`
//! - `GuideRegistry`: code lookup with generic fallback

pub mod box_guide;
pub mod guide;
pub mod profile_guide;
pub mod registry;
pub mod validate;
