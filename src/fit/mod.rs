//! Model fitting pipeline
//!
//! Binds the learning agent, the recorded task, and the behavioral scorer
//! into an [`AnnealingProblem`] and assembles the fit report: the annealer's
//! move is a full parameter re-draw plus agent reset, its energy one full
//! learning episode scored by mismatch count against the reference sequence.

pub mod observers;

use std::{fs::File, path::Path};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::RecordedTask,
    agent::{AgentConfig, AgentSnapshot, QAgent},
    annealing::{AnnealSchedule, Annealer, AnnealingProblem},
    error::{Error, Result},
    params::ParameterSet,
    ports::{AnnealObserver, Policy, Task},
    scorer::{aic, log_likelihood, mismatch_count, reference_sequence},
    types::{ActionId, StateId},
};

pub use observers::ProgressObserver;

/// The concrete annealing problem: fit an agent's hyperparameters to a
/// recorded action sequence.
pub struct ModelFit<'a> {
    task: &'a dyn Task,
    agent: QAgent,
    reference: Vec<ActionId>,
}

impl<'a> ModelFit<'a> {
    /// Bind an agent and reference sequence to a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceLengthMismatch`] if the agent's episode
    /// length differs from the reference sequence; the two must align
    /// trial-for-trial before any annealing step runs.
    pub fn new(task: &'a dyn Task, agent: QAgent, reference: Vec<ActionId>) -> Result<Self> {
        if agent.iterations() != reference.len() {
            return Err(Error::SequenceLengthMismatch {
                expected: reference.len(),
                got: agent.iterations(),
            });
        }
        Ok(Self {
            task,
            agent,
            reference,
        })
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }
}

impl AnnealingProblem for ModelFit<'_> {
    type Snapshot = AgentSnapshot;

    /// A move is a global jump: every parameter re-drawn from its prior and
    /// the value table reset to all-zero.
    fn propose_move(&mut self, rng: &mut StdRng) -> Result<()> {
        self.agent.set_parameters(ParameterSet::sample(rng));
        self.agent.reset();
        Ok(())
    }

    /// One full learning episode, scored by mismatch count.
    fn energy(&mut self, _rng: &mut StdRng) -> Result<f64> {
        let actions = self.agent.run_episode(self.task)?;
        Ok(mismatch_count(&actions, &self.reference)? as f64)
    }

    fn snapshot(&self) -> AgentSnapshot {
        self.agent.export_snapshot()
    }

    fn restore(&mut self, snapshot: &AgentSnapshot) {
        self.agent.restore_snapshot(snapshot);
    }
}

/// One row of the reported value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub state: StateId,
    pub action: ActionId,
    pub value: f64,
}

/// Configuration for a fit run.
#[derive(Debug, Clone, Default)]
pub struct FitConfig {
    /// Annealing schedule
    pub schedule: AnnealSchedule,
    /// Random seed for the whole run (annealer and agent streams)
    pub seed: Option<u64>,
    /// Episode length override; must equal the recording length
    pub iterations: Option<usize>,
    /// Starting state override
    pub initial_state: Option<StateId>,
}

/// Result of a fit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    /// Policy the agent was fitted with
    pub policy: String,

    /// Annealing schedule used
    pub schedule: AnnealSchedule,

    /// Seed, if the run was deterministic
    pub seed: Option<u64>,

    /// Number of recorded trials
    pub trials: usize,

    /// Lowest mismatch count observed
    pub best_energy: f64,

    /// Accepted moves over the run
    pub accepted_moves: usize,

    /// Attempted moves over the run
    pub attempted_moves: usize,

    /// Best-found hyperparameters
    pub parameters: ParameterSet,

    /// Action sequence the best agent emitted
    pub actions: Vec<ActionId>,

    /// Best agent's final value table
    pub q_table: Vec<TableEntry>,

    /// Log-likelihood of the subject's observed choices under the best
    /// agent's logged policy (reporting companion, not the objective)
    pub log_likelihood: f64,

    /// Akaike information criterion for the fit
    pub aic: f64,
}

impl FitReport {
    /// Save the report to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create report {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open report {path:?}"),
            source,
        })?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Run a full fit: anneal the agent's hyperparameters against the recording
/// and assemble the report from the best point found.
///
/// The annealer and the agent run on distinct streams derived from the seed,
/// so a seeded fit is reproducible end to end.
///
/// # Errors
///
/// Configuration errors (empty spaces, non-binary action set, mismatched
/// lengths, invalid schedule) surface before the first annealing step;
/// numerical errors abort the run at the step that produced them.
pub fn run_fit(
    task: &RecordedTask,
    policy: Box<dyn Policy>,
    config: &FitConfig,
    observers: Vec<Box<dyn AnnealObserver>>,
) -> Result<FitReport> {
    let mut rng = build_rng(config.seed);

    let agent_config = AgentConfig {
        iterations: config.iterations,
        initial_state: config.initial_state.clone(),
        seed: config.seed.map(|seed| seed.wrapping_add(1)),
    };

    let policy_name = policy.name().to_string();
    let params = ParameterSet::sample(&mut rng);
    let agent = QAgent::new(task, params, policy, agent_config)?;
    let reference = reference_sequence(task.recording())?;
    let mut problem = ModelFit::new(task, agent, reference)?;

    let mut annealer = Annealer::new(config.schedule.clone());
    for observer in observers {
        annealer = annealer.with_observer(observer);
    }
    let outcome = annealer.run(&mut problem, &mut rng)?;

    let best = outcome.best_snapshot;
    let observed = task.recording().observed_actions();
    let fit_log_likelihood = log_likelihood(&best.action_log, &best.visited_states, &observed)?;

    Ok(FitReport {
        policy: policy_name,
        schedule: config.schedule.clone(),
        seed: config.seed,
        trials: task.num_trials(),
        best_energy: outcome.best_energy,
        accepted_moves: outcome.accepted_moves,
        attempted_moves: outcome.attempted_moves,
        parameters: best.params.clone(),
        actions: best.actions_taken.clone(),
        q_table: best
            .q_table
            .entries()
            .into_iter()
            .map(|(state, action, value)| TableEntry {
                state,
                action,
                value,
            })
            .collect(),
        log_likelihood: fit_log_likelihood,
        aic: aic(fit_log_likelihood),
    })
}
