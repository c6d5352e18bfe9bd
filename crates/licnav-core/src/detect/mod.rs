//! Jurisdiction and business type detection.

pub mod business;
pub mod jurisdiction;
pub mod text;
