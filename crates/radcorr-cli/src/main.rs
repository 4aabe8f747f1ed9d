mod commands;
mod loader;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "radcorr", about = "Radial noise correlation of rendered image ensembles")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the correlation curve of one ensemble directory
    Curve(commands::curve::CurveArgs),
    /// Compute curves for every experiment directory under a root
    Batch(commands::batch::BatchArgs),
    /// Measure RMSE/MAPE of an ensemble against a reference image
    Error(commands::reference_error::ErrorArgs),
    /// Print the default analysis config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Error(args) => commands::reference_error::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
