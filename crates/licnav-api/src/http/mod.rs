//! HTTP/REST API layer for License Navigator.
//!
//! Axum-based JSON API at `/api/v1/` with an envelope response format and
//! CORS support. No authentication: bind to localhost or put it behind a
//! proxy that handles that.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod response;
pub mod router;
pub mod sessions;
