//! Retrieval, detection, prompt building and answer orchestration for
//! License Navigator.
//!
//! This crate defines the ports (`Embedder`, `VectorIndex`, `LlmProvider`,
//! `LicenseGuide`) that `licnav-infra` implements. It depends only on
//! `licnav-types`, never on `licnav-infra` or any model/database crate.

pub mod answer;
pub mod chat;
pub mod detect;
pub mod jurisdiction;
pub mod llm;
pub mod navigator;
pub mod prompt;
pub mod retrieval;

#[cfg(test)]
mod test_support;
