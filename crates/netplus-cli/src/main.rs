//! NetPlus CLI - Command-line interface for the netplus signal chain simulator.

mod commands;
mod transmitter;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netplus")]
#[command(author, version, about = "NetPlus signal chain simulator", long_about = None)]
struct Cli {
    /// Run configuration file (default: ./netplus.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the QAM transmitter described by the run configuration
    Run(commands::run::RunArgs),

    /// Show the header and sample count of a signal file
    Inspect(commands::inspect::InspectArgs),

    /// Convert a signal file to WAV
    ExportWav(commands::export_wav::ExportWavArgs),

    /// Show or create the run configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::common::load_config(cli.config.as_deref());
    let default_filter = config
        .as_ref()
        .map_or_else(|_| "info".to_string(), |c| c.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args, config?),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::ExportWav(args) => commands::export_wav::run(args),
        Commands::Config(args) => commands::config::run(args, cli.config.as_deref()),
    }
}
