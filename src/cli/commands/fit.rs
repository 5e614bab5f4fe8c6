//! Fit command - anneal agent hyperparameters against a recording

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::PolicyChoice;
use crate::{
    adapters::RecordedTask,
    annealing::AnnealSchedule,
    cli::output::{print_kv, print_section, print_stats_table},
    fit::{FitConfig, ProgressObserver, run_fit},
    params::LearningRate,
    ports::AnnealObserver,
    recording::Recording,
    types::StateId,
};

#[derive(Parser, Debug)]
#[command(about = "Fit a behavioral model to a recorded choice sequence")]
pub struct FitArgs {
    /// Path to the recorded-trial CSV file
    #[arg(long, short = 'r')]
    pub recording: PathBuf,

    /// Action-selection policy to fit
    #[arg(long, value_enum, default_value_t = PolicyChoice::EpsilonGreedy)]
    pub policy: PolicyChoice,

    /// Maximum (starting) annealing temperature
    #[arg(long, default_value_t = 500.0)]
    pub t_max: f64,

    /// Minimum (ending) annealing temperature
    #[arg(long, default_value_t = 2.5)]
    pub t_min: f64,

    /// Number of annealing steps
    #[arg(long, default_value_t = 5000)]
    pub steps: usize,

    /// Approximate number of progress updates
    #[arg(long, default_value_t = 100)]
    pub updates: usize,

    /// Learning iterations per episode (must equal the recording length;
    /// defaults to it)
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Initial state label (defaults to the first recorded state)
    #[arg(long)]
    pub initial_state: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the JSON fit report
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,
}

pub fn execute(args: FitArgs) -> Result<()> {
    let recording = Recording::from_csv(&args.recording)?;
    let trials = recording.len();
    let task = RecordedTask::new(recording);

    let config = FitConfig {
        schedule: AnnealSchedule::new(args.t_max, args.t_min, args.steps, args.updates)?,
        seed: args.seed,
        iterations: args.iterations,
        initial_state: args.initial_state.map(StateId::new),
    };

    let mut observers: Vec<Box<dyn AnnealObserver>> = Vec::new();
    if args.progress {
        observers.push(Box::new(ProgressObserver::new(args.updates)));
    }

    let report = run_fit(&task, args.policy.build(), &config, observers)?;

    print_section("Fit summary");
    print_stats_table(&[
        ("Recording", format!("{} ({trials} trials)", args.recording.display())),
        ("Policy", report.policy.clone()),
        ("Best energy", format!("{} mismatches", report.best_energy)),
        (
            "Accepted moves",
            format!("{}/{}", report.accepted_moves, report.attempted_moves),
        ),
        ("Log-likelihood", format!("{:.4}", report.log_likelihood)),
        ("AIC", format!("{:.4}", report.aic)),
    ]);

    print_section("Best parameters");
    match report.parameters.learning_rate() {
        LearningRate::Constant(alpha) => print_kv("learning_rate", &format!("{alpha:.6}")),
        LearningRate::Decay { initial, rate } => {
            print_kv("learning_rate", &format!("{initial:.6} / (1 + {rate:.6} t)"))
        }
    }
    print_stats_table(&[
        (
            "discount_factor",
            format!("{:.6}", report.parameters.discount_factor()),
        ),
        (
            "exploration_prob",
            format!("{:.6}", report.parameters.exploration_prob()),
        ),
        (
            "inverse_temperature",
            format!("{:.6}", report.parameters.inverse_temperature()),
        ),
    ]);

    print_section("Best value table");
    for entry in &report.q_table {
        print_kv(
            &format!("({}, {})", entry.state, entry.action),
            &format!("{:.6}", entry.value),
        );
    }

    if let Some(path) = &args.output {
        report.save(path)?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}
