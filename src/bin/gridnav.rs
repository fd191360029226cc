//! gridnav CLI - Train and run Q-learning agents that navigate out of a grid
//!
//! This CLI provides a unified interface for:
//! - Running agents on an ASCII map in training or exploitation mode
//! - Inspecting persisted Q-tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridnav")]
#[command(version, about = "Q-learning agents that find the exit of a grid", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run agents on a map until they exit or time out
    Run(Box<gridnav::cli::commands::run::RunArgs>),

    /// Summarize a Q-table file
    Inspect(gridnav::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => gridnav::cli::commands::run::execute(*args),
        Commands::Inspect(args) => gridnav::cli::commands::inspect::execute(args),
    }
}
