//! Simulate command - run one learning episode with explicit parameters

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::PolicyChoice;
use crate::{
    adapters::RecordedTask,
    agent::{AgentConfig, QAgent},
    cli::output::{print_kv, print_section, print_stats_table},
    params::{LearningRate, ParameterSet},
    recording::Recording,
    scorer::{aic, log_likelihood, mismatch_count, reference_sequence},
    types::StateId,
};

#[derive(Parser, Debug)]
#[command(about = "Run a single learning episode with explicit parameters")]
pub struct SimulateArgs {
    /// Path to the recorded-trial CSV file
    #[arg(long, short = 'r')]
    pub recording: PathBuf,

    /// Action-selection policy
    #[arg(long, value_enum, default_value_t = PolicyChoice::EpsilonGreedy)]
    pub policy: PolicyChoice,

    /// Learning rate alpha in [0, 1]
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Discount factor gamma in [0, 1]
    #[arg(long, default_value_t = 0.9)]
    pub discount_factor: f64,

    /// Exploration probability epsilon in [0, 1]
    #[arg(long, default_value_t = 0.1)]
    pub exploration_prob: f64,

    /// Softmax inverse temperature beta (> 0)
    #[arg(long, default_value_t = 1.0)]
    pub inverse_temperature: f64,

    /// Learning iterations (defaults to the recording length)
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Initial state label (defaults to the first recorded state)
    #[arg(long)]
    pub initial_state: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let recording = Recording::from_csv(&args.recording)?;
    let reference = reference_sequence(&recording)?;
    let observed = recording.observed_actions();
    let task = RecordedTask::new(recording);

    let params = ParameterSet::new(
        LearningRate::Constant(args.learning_rate),
        args.discount_factor,
        args.exploration_prob,
        args.inverse_temperature,
    )?;

    let config = AgentConfig {
        iterations: args.iterations,
        initial_state: args.initial_state.map(StateId::new),
        seed: args.seed,
    };

    let mut agent = QAgent::new(&task, params, args.policy.build(), config)?;
    let actions = agent.run_episode(&task)?;

    let energy = mismatch_count(&actions, &reference)?;
    let episode_log_likelihood =
        log_likelihood(agent.action_log(), agent.visited_states(), &observed)?;

    print_section("Episode summary");
    print_stats_table(&[
        ("Recording", format!("{}", args.recording.display())),
        ("Policy", agent.policy_name().to_string()),
        ("Iterations", format!("{}", actions.len())),
        ("Energy", format!("{energy} mismatches")),
        ("Log-likelihood", format!("{episode_log_likelihood:.4}")),
        ("AIC", format!("{:.4}", aic(episode_log_likelihood))),
    ]);

    print_section("Final value table");
    for (state, action, value) in agent.q_table().entries() {
        print_kv(&format!("({state}, {action})"), &format!("{value:.6}"));
    }

    Ok(())
}
