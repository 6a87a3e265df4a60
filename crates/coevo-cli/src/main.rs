//! Coevo CLI - evolve collision-free paths for two planar arms.

mod arm;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "coevo")]
#[command(author, version, about = "Coevo - two-arm path coevolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default coevo.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Run the coevolution
    Run {
        /// Config file (default: coevo.toml in this or a parent directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of generations
        #[arg(short, long)]
        generations: Option<u32>,

        /// Override the random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save a checkpoint here when the run ends
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Continue a run from a checkpoint
    Resume {
        /// Checkpoint file
        checkpoint: PathBuf,

        /// Config file for the arm geometry
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// New total number of generations
        #[arg(short, long)]
        generations: Option<u32>,

        /// Random seed for the continued run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    ShowConfig {
        /// Config file (default: coevo.toml in this or a parent directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { config, generations, seed, output, checkpoint } => commands::run::run(commands::run::RunArgs {
            config,
            generations,
            seed,
            output,
            checkpoint,
        }),
        Commands::Resume { checkpoint, config, generations, seed, output } => {
            commands::run::resume(&checkpoint, commands::run::RunArgs {
                config,
                generations,
                seed,
                output,
                checkpoint: Some(checkpoint.clone()),
            })
        }
        Commands::ShowConfig { config } => commands::show_config::run(config),
    }
}
