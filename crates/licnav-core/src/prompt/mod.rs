//! Prompt construction for LLM calls.

pub mod builder;
