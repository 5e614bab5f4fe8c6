//! qfit CLI - fit reinforcement-learning behavioral models to recorded
//! choice data
//!
//! This CLI provides:
//! - Fitting agent hyperparameters by simulated annealing (`fit`)
//! - Running single episodes with explicit parameters (`simulate`)

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qfit")]
#[command(version, about = "Behavioral model fitting for recorded choice tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit agent hyperparameters to a recording by simulated annealing
    Fit(qfit::cli::commands::fit::FitArgs),

    /// Run a single learning episode with explicit parameters
    Simulate(qfit::cli::commands::simulate::SimulateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fit(args) => qfit::cli::commands::fit::execute(args),
        Commands::Simulate(args) => qfit::cli::commands::simulate::execute(args),
    }
}
