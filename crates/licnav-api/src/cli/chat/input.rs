//! Line editing for the chat REPL, on top of `rustyline_async`.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, trimmed. May be empty.
    Message(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
    last_entry: Option<String>,
}

impl ChatInput {
    /// The `SharedWriter` prints above the prompt without clobbering it.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((
            Self {
                rl,
                last_entry: None,
            },
            writer,
        ))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        let line = match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => line.trim().to_string(),
            Ok(ReadlineEvent::Eof) => return InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => return InputEvent::Interrupted,
            Err(e) => {
                tracing::debug!(error = %e, "readline failed, ending session");
                return InputEvent::Eof;
            }
        };

        // Up-arrow should not step through the same question repeated.
        if !line.is_empty() && self.last_entry.as_deref() != Some(line.as_str()) {
            self.rl.add_history_entry(line.clone());
            self.last_entry = Some(line.clone());
        }
        InputEvent::Message(line)
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before the process prints outside the prompt.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
