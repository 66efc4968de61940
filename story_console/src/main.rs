//! Story console - play and maintain choose-your-own-adventure files.
//!
//! # Commands
//! - `story play <file>` - Play a story interactively
//! - `story check <file>` - Validate a story file and summarize it
//! - `story format <file>` - Re-export a story file in canonical layout

mod check;
mod format;
mod play;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log directives used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Story console
#[derive(Parser)]
#[command(name = "story")]
#[command(author, version, about = "Play and maintain choose-your-own-adventure stories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively
    Play {
        /// Story file to load
        file: PathBuf,
    },

    /// Validate a story file
    Check {
        /// Story file to load
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a story file in canonical layout
    Format {
        /// Story file to load
        file: PathBuf,

        /// Output file (default: derived from the story name and config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML file with export settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { file } => play::run_play_command(&file),
        Commands::Check { file, json } => check::run_check_command(&file, json),
        Commands::Format {
            file,
            output,
            config,
        } => format::run_format_command(&file, output.as_deref(), config.as_deref()),
    }
}

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
