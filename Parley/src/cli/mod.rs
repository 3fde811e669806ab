//! Parley CLI - inspect, validate and play dialogue graphs

pub mod commands;

use crate::config::ParleyConfig;
use clap::Parser;
use commands::Commands;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley: inspect and play branching dialogue graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./parley.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dialogue directory, overriding the config
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the Parley CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ParleyConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        config.dialogue_dir = dir;
    }

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute(&config)?;

    Ok(())
}
