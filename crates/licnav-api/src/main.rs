//! License Navigator CLI and REST API entry point.
//!
//! Binary name: `licnav`
//!
//! Parses CLI arguments, loads configuration, builds the guide registry and
//! navigator, then dispatches to a command handler or starts the API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, ConfigCommand, StatesCommand};
use licnav_infra::config::{load_app_config, resolve_data_dir};
use licnav_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use state::{AppState, Retrieval};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither config nor tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "licnav", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_app_config(&data_dir).await;

    let filter = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => config.logging.level.clone(),
        1 => "info,licnav_core=debug,licnav_infra=debug,licnav_api=debug".to_string(),
        _ => "trace".to_string(),
    };
    if let Err(e) = init_tracing(&TracingOptions {
        filter,
        json: config.logging.json,
        otel: config.logging.otel,
    }) {
        eprintln!("Warning: tracing setup failed: {e}");
    }

    let result = run(cli, data_dir).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, data_dir: std::path::PathBuf) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        // Commands that only read or write files under the data directory
        Commands::States { action } => match action {
            StatesCommand::List => cli::states::list(&data_dir, json).await?,
            StatesCommand::Enable { code } => cli::states::enable(&data_dir, &code, json).await?,
            StatesCommand::Disable { code } => cli::states::disable(&data_dir, &code, json).await?,
            StatesCommand::Add { code, name } => {
                cli::states::add(&data_dir, &code, &name, json).await?
            }
        },

        Commands::Config { action } => match action {
            ConfigCommand::Show => cli::config::show(&data_dir, json).await?,
            ConfigCommand::Path => cli::config::path(&data_dir, json)?,
        },

        // Profile data only, no embedding model
        Commands::Steps { state } => {
            let app = AppState::init(data_dir, Retrieval::KeywordOnly).await?;
            cli::guide::steps(&app, state.as_deref(), json)?;
        }

        Commands::Categories { state } => {
            let app = AppState::init(data_dir, Retrieval::KeywordOnly).await?;
            cli::guide::categories(&app, state.as_deref(), json)?;
        }

        Commands::Resources { state, category } => {
            let app = AppState::init(data_dir, Retrieval::KeywordOnly).await?;
            cli::guide::resources(&app, state.as_deref(), category.as_deref(), json)?;
        }

        Commands::Prompt { query, kind, state } => {
            let app = AppState::init(data_dir, Retrieval::KeywordOnly).await?;
            cli::prompt::print_prompt(&app, &query, kind, state.as_deref(), json)?;
        }

        // Retrieval-backed commands
        Commands::Chat { state } => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;
            cli::chat::loop_runner::run_chat_loop(&app, state.as_deref()).await?;
        }

        Commands::Ask { query, state } => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;
            cli::guide::ask(&app, &query, state.as_deref(), json).await?;
        }

        Commands::Search { query, state, top_k } => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;
            cli::guide::search(&app, &query, state.as_deref(), top_k, json).await?;
        }

        Commands::Similar {
            license_type,
            state,
            top_k,
        } => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;
            cli::guide::similar(&app, &license_type, state.as_deref(), top_k, json).await?;
        }

        Commands::Index => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;
            cli::index::rebuild(&app, json).await?;
        }

        Commands::Serve { port, host } => {
            let app = AppState::init(data_dir, Retrieval::Vector).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} License Navigator API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(app);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that fails to install never resolves, so the other one still
/// stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
