mod cli;
mod config;
mod error;
mod manifest;
mod pipeline;
mod publisher;
mod registry;
mod stager;
mod storage;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "promover",
    about = "Model promotion pipeline: registry run -> versioned object storage -> GitOps manifest update",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Promote the latest run of an experiment to the live deployment manifest
    Promote(cli::PromoteArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter_layer = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("info")
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Promover v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Promote(args) => cli::cmd_promote(args)?,
    }

    Ok(())
}
