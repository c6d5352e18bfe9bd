//! Main chat loop orchestration.
//!
//! Banner, input loop, commands, and answer rendering. The conversation
//! history lives only as long as the loop.

use std::time::{Duration, Instant};

use console::style;

use licnav_core::navigator::Conversation;
use licnav_types::error::NavigatorError;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the interactive chat loop.
///
/// `state_hint` is appended to questions that name no jurisdiction, so
/// `licnav chat --state FL` behaves as if every question mentioned Florida.
pub async fn run_chat_loop(app: &AppState, state_hint: Option<&str>) -> anyhow::Result<()> {
    let navigator = app.navigator.clone();
    let guides: Vec<String> = app
        .registry()
        .all()
        .map(|g| format!("{} ({})", g.name(), g.code()))
        .collect();
    let provider_label = match (navigator.provider_type(), navigator.provider_unavailable()) {
        (Some(provider), _) => provider.attribution().to_string(),
        (None, Some(reason)) => format!("built-in ({reason})"),
        (None, None) => "built-in".to_string(),
    };
    let default_state = state_hint.unwrap_or(&app.config.default_state).to_ascii_uppercase();
    print_welcome_banner(&default_state, &guides, &provider_label);

    let renderer = ChatRenderer::new();
    let mut conversation = Conversation::new(navigator);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => {
                            conversation.clear();
                            chat_input.clear();
                            println!("  {}", style("Conversation cleared.").dim());
                        }
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::History => print_history(&conversation),
                        ChatCommand::States => print_states(app),
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                let question = with_state_hint(app, &text, state_hint);

                let spinner = indicatif::ProgressBar::new_spinner();
                if let Ok(spinner_style) =
                    indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
                {
                    spinner.set_style(spinner_style);
                }
                spinner.set_message("researching licenses...");
                spinner.enable_steady_tick(Duration::from_millis(80));

                let start = Instant::now();
                let result = conversation.ask(&question).await;
                spinner.finish_and_clear();

                match result {
                    Ok(answer) => {
                        println!();
                        println!("{}", renderer.render(&answer.markdown));
                        renderer.print_footer(&answer, start.elapsed().as_millis() as u64);
                        println!();
                    }
                    Err(NavigatorError::EmptyQuery) => {
                        println!(
                            "\n  {} {}\n",
                            style("!").yellow().bold(),
                            style("Please describe your business.").dim()
                        );
                    }
                    Err(e) => {
                        eprintln!("\n  {} {e}\n", style("!").red().bold());
                    }
                }
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Append the `--state` jurisdiction unless the question already names one.
fn with_state_hint(app: &AppState, text: &str, state_hint: Option<&str>) -> String {
    let Some(code) = state_hint else {
        return text.to_string();
    };
    let registry = app.registry();
    if licnav_core::detect::jurisdiction::detect_jurisdiction(text, registry.profiles()).is_some() {
        return text.to_string();
    }
    match registry.get(code) {
        Some(guide) => format!("{text} in {}", guide.name()),
        None => text.to_string(),
    }
}

fn print_history(conversation: &Conversation) {
    let turns = conversation.history().turns();
    println!();
    if turns.is_empty() {
        println!("  {}", style("No questions yet.").dim());
    }
    for (i, turn) in turns.iter().enumerate() {
        let preview: String = turn.user_input.chars().take(100).collect();
        println!(
            "  {} {} {}",
            style(format!("{}.", i + 1)).bold(),
            style(turn.timestamp.format("%H:%M:%S")).dim(),
            preview
        );
    }
    println!();
}

fn print_states(app: &AppState) {
    println!();
    for info in app.registry().infos() {
        let search = if info.vector_search { "vector" } else { "keyword" };
        println!(
            "  {} {} {}",
            style(format!("{:<8}", info.code)).cyan().bold(),
            info.name,
            style(format!("({} records, {search} search)", info.record_count)).dim()
        );
    }
    println!();
}
