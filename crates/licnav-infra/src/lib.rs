//! Infrastructure layer for License Navigator.
//!
//! Implements the ports defined in `licnav-core`: the LanceDB vector index,
//! the fastembed embedder, and the Gemini / OpenAI-compatible / Ollama LLM
//! providers. Also owns the on-disk pieces: `config.toml` and jurisdiction
//! profile files.

pub mod config;
pub mod jurisdiction;
pub mod llm;
pub mod vector;
