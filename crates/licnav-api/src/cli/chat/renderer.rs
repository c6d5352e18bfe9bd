//! Terminal markdown rendering for answers.

use termimad::MadSkin;
use termimad::crossterm::style::Color;

use licnav_types::chat::GuidanceAnswer;

/// Renders answer markdown with `termimad`.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render a complete markdown answer for the terminal.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Footer line: jurisdiction, retrieval path, guidance source, elapsed time.
    pub fn print_footer(&self, answer: &GuidanceAnswer, response_ms: u64) {
        let guidance = match answer.provider {
            Some(provider) => provider.to_string(),
            None => "built-in".to_string(),
        };
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "\n  {} {} {} {} search {} {} {} {:.1}s",
            console::style("|").dim(),
            console::style(&answer.jurisdiction_code).dim(),
            console::style("\u{00b7}").dim(),
            console::style(answer.method).dim(),
            console::style("\u{00b7}").dim(),
            console::style(guidance).dim(),
            console::style("\u{00b7}").dim(),
            console::style(seconds).dim(),
        );
        if let Some(reason) = &answer.fallback_reason {
            println!("  {}", console::style(format!("built-in guidance used: {reason}")).dim());
        }
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_text() {
        let rendered = ChatRenderer::new().render("## Summary\n\nA **bakery** in Delaware.");
        assert!(rendered.contains("Summary"));
        assert!(rendered.contains("bakery"));
    }
}
