//! Command parsing for the chat loop.
//!
//! Commands start with `/`. The bare words `exit`, `quit`, `clear`,
//! `history` and `servers` are accepted too.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Forget the conversation and clear the screen.
    Clear,
    Exit,
    History,
    /// List the loaded jurisdiction guides.
    States,
    Unknown(String),
}

/// Parse user input as a command. `None` means the input is a question.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') {
        return match lower.as_str() {
            "exit" | "quit" => Some(ChatCommand::Exit),
            "clear" => Some(ChatCommand::Clear),
            "history" => Some(ChatCommand::History),
            "servers" | "states" => Some(ChatCommand::States),
            "help" => Some(ChatCommand::Help),
            _ => None,
        };
    }

    let cmd = lower.split_whitespace().next().unwrap_or_default();
    match cmd {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        "/states" | "/servers" => Some(ChatCommand::States),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/clear").cyan(), "Forget the conversation and clear the screen");
    println!("  {}  {}", style("/history").cyan(), "Show the questions asked so far");
    println!("  {}   {}", style("/states").cyan(), "List the loaded jurisdiction guides");
    println!("  {}     {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!(
        "  {}",
        style("Example: I want to open a bakery in Wilmington, Delaware").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_commands() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("/states"), Some(ChatCommand::States));
    }

    #[test]
    fn test_parse_bare_words() {
        assert_eq!(parse("exit"), Some(ChatCommand::Exit));
        assert_eq!(parse(" Quit "), Some(ChatCommand::Exit));
        assert_eq!(parse("clear"), Some(ChatCommand::Clear));
        assert_eq!(parse("history"), Some(ChatCommand::History));
        assert_eq!(parse("servers"), Some(ChatCommand::States));
    }

    #[test]
    fn test_questions_are_not_commands() {
        assert_eq!(parse("How do I clear a zoning hurdle in Florida?"), None);
        assert_eq!(parse("restaurant in Delaware"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
