//! Shared domain types for License Navigator.
//!
//! This crate contains the core domain types used across the workspace:
//! license records, jurisdiction profiles, business analysis, conversation
//! turns, LLM request shapes, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod business;
pub mod chat;
pub mod config;
pub mod error;
pub mod jurisdiction;
pub mod license;
pub mod llm;
