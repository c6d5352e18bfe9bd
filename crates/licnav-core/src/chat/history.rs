//! In-memory conversation history.

use std::fmt::Write as _;

use licnav_types::chat::ConversationTurn;

/// Number of turns included in the prompt context block.
pub const CONTEXT_TURNS: usize = 3;

/// Characters kept from each side of a turn in the context block.
pub const CONTEXT_CHARS: usize = 100;

/// Turns kept per conversation. Older turns are dropped on `record`.
pub const MAX_TURNS: usize = 50;

/// Ordered list of turns for one conversation, at most [`MAX_TURNS`] long.
/// Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Prompt block with the last [`CONTEXT_TURNS`] turns, each side cut to
    /// [`CONTEXT_CHARS`] characters. Empty when there is no history.
    pub fn context_block(&self) -> String {
        let mut out = String::new();
        for turn in self.recent(CONTEXT_TURNS) {
            let _ = writeln!(out, "User: {}", truncate_chars(&turn.user_input, CONTEXT_CHARS));
            let _ = writeln!(out, "Assistant: {}", truncate_chars(&turn.response, CONTEXT_CHARS));
        }
        out
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
