//! Conversation input handling and in-memory history.

pub mod history;
pub mod sanitize;
