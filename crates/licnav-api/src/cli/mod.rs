//! CLI command definitions for the `licnav` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod guide;
pub mod index;
pub mod prompt;
pub mod states;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Business license guidance for US jurisdictions.
#[derive(Parser)]
#[command(name = "licnav", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation.
    Chat {
        /// Jurisdiction for questions that do not name one (e.g. FL).
        #[arg(long)]
        state: Option<String>,
    },

    /// Answer a single question.
    Ask {
        /// Business description, e.g. "food truck in Miami, Florida".
        query: String,

        /// Jurisdiction for a question that does not name one.
        #[arg(long)]
        state: Option<String>,
    },

    /// Search a jurisdiction's license records.
    Search {
        query: String,

        #[arg(long)]
        state: Option<String>,

        /// Number of results.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Licenses similar to a license type.
    Similar {
        /// License type, e.g. "Money Transmitter License".
        license_type: String,

        #[arg(long)]
        state: Option<String>,

        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Start-a-business steps for a jurisdiction.
    Steps {
        #[arg(long)]
        state: Option<String>,
    },

    /// License categories in a jurisdiction's records.
    Categories {
        #[arg(long)]
        state: Option<String>,
    },

    /// Official resource links.
    Resources {
        #[arg(long)]
        state: Option<String>,

        /// Only one category (main, licenses, taxes, ...).
        #[arg(long)]
        category: Option<String>,
    },

    /// Rebuild the vector index for every enabled jurisdiction.
    Index,

    /// Manage jurisdictions.
    States {
        #[command(subcommand)]
        action: StatesCommand,
    },

    /// Show configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Print an LLM prompt template filled in for a query.
    Prompt {
        query: String,

        #[arg(long, value_enum, default_value = "main")]
        kind: PromptKind,

        #[arg(long)]
        state: Option<String>,
    },

    /// Start the JSON HTTP API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum StatesCommand {
    /// List built-in and custom jurisdictions.
    #[command(alias = "ls")]
    List,

    /// Enable a jurisdiction.
    Enable { code: String },

    /// Disable a jurisdiction.
    Disable { code: String },

    /// Scaffold a custom jurisdiction file in the data directory.
    Add {
        /// Two-letter code, e.g. TX.
        code: String,

        /// Full name, e.g. Texas.
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,

    /// Print the config file path.
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PromptKind {
    /// Full compliance guide.
    Main,
    /// State-specific guide grounded in state data.
    State,
    /// Industry-focused guidance.
    Industry,
    /// Cost breakdown.
    Cost,
    /// Timeline and deadlines.
    Timeline,
}
