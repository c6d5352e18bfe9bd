//! REST API handlers.

pub mod ask;
pub mod session;
pub mod states;
