//! Interactive CLI chat for License Navigator.
//!
//! Reads questions, runs them through the navigator, and renders the
//! markdown answers. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
