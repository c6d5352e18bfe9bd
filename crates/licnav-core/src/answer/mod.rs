//! Answer text: canned fallbacks and markdown rendering.

pub mod fallback;
pub mod render;
