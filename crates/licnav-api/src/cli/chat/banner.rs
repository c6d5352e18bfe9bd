//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the default jurisdiction, the enabled guides, and which provider
/// writes the guidance (or why the built-in text is used).
pub fn print_welcome_banner(default_state: &str, guides: &[String], provider: &str) {
    println!();
    println!(
        "  {} {}",
        style("§").cyan().bold(),
        style("Business License Navigator").cyan().bold()
    );
    println!(
        "  {}",
        style("Describe your business and where it operates.").dim()
    );
    println!();
    println!("  {}  {}", style("Default state:").bold(), style(default_state).dim());
    println!("  {}         {}", style("Guides:").bold(), style(guides.join(", ")).dim());
    println!("  {}       {}", style("Guidance:").bold(), style(provider).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
