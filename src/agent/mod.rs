//! Tabular Q-learning agent
//!
//! The agent owns the value table, the hyperparameters, a pluggable
//! action-selection policy, and its own random stream. One episode walks the
//! recorded trial sequence: select an action under the current policy, query
//! the task oracle, apply the Q-learning update, log the policy's
//! per-state probability snapshot, advance to the scheduled next state.
//!
//! All episode state (table, logs, emitted actions) lives on the instance and
//! is re-created by [`QAgent::reset`]; nothing is shared between agents.

pub mod q_table;

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, Result},
    params::ParameterSet,
    ports::{Policy, Task},
    types::{ActionId, StateId},
};

pub use q_table::QTable;

/// One per-iteration row of the action-probability log: the natural log of
/// each (state, action) probability under the policy at that iteration.
pub type LogProbRow = HashMap<(StateId, ActionId), f64>;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Configuration for creating a learning agent.
///
/// # Examples
///
/// ```
/// use qfit::agent::AgentConfig;
///
/// let config = AgentConfig::new().with_seed(42).with_iterations(500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Learning iterations per episode; defaults to the task's trial count
    pub iterations: Option<usize>,
    /// Starting state; defaults to the first state in the task's order
    pub initial_state: Option<StateId>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of learning iterations per episode.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Set the starting state.
    pub fn with_initial_state(mut self, state: StateId) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the random seed for deterministic episodes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Captured agent state.
///
/// The optimizer treats the agent as its mutable search state; a snapshot is
/// everything needed to undo a rejected move or reinstate the best point
/// found. The random stream is deliberately not captured: restoring a
/// snapshot rewinds what the agent learned, not where its randomness is.
#[derive(Debug, Clone)]
pub struct AgentSnapshot {
    pub params: ParameterSet,
    pub q_table: QTable,
    pub current_state: StateId,
    pub actions_taken: Vec<ActionId>,
    pub visited_states: Vec<StateId>,
    pub value_history: Vec<QTable>,
    pub action_log: Vec<LogProbRow>,
}

/// Tabular Q-learning agent with a pluggable action-selection policy
pub struct QAgent {
    q_table: QTable,
    params: ParameterSet,
    policy: Box<dyn Policy>,
    iterations: usize,
    initial_state: StateId,
    current_state: StateId,
    actions_taken: Vec<ActionId>,
    visited_states: Vec<StateId>,
    value_history: Vec<QTable>,
    action_log: Vec<LogProbRow>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QAgent {
    /// Create an agent for the given task.
    ///
    /// The value table is initialized to zero over the full states × actions
    /// product and the logs start empty.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the task's state or action set is
    /// empty, or if the configured initial state is not a task state.
    pub fn new(
        task: &dyn Task,
        params: ParameterSet,
        policy: Box<dyn Policy>,
        config: AgentConfig,
    ) -> Result<Self> {
        let states = task.states();
        let actions = task.actions();
        if states.is_empty() {
            return Err(Error::EmptyStateSpace);
        }
        if actions.is_empty() {
            return Err(Error::EmptyActionSpace);
        }

        let initial_state = match config.initial_state {
            Some(state) => {
                if !states.contains(&state) {
                    return Err(Error::UnknownState {
                        state: state.to_string(),
                    });
                }
                state
            }
            None => states[0].clone(),
        };

        Ok(Self {
            q_table: QTable::initialize(states, actions),
            params,
            policy,
            iterations: config.iterations.unwrap_or(task.num_trials()),
            current_state: initial_state.clone(),
            initial_state,
            actions_taken: Vec::new(),
            visited_states: Vec::new(),
            value_history: Vec::new(),
            action_log: Vec::new(),
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    /// Restore the agent to its initial condition: all-zero table, empty
    /// logs, starting state, and (for seeded agents) the original random
    /// stream.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.actions_taken.clear();
        self.visited_states.clear();
        self.value_history.clear();
        self.action_log.clear();
        self.current_state = self.initial_state.clone();
        self.rng = build_rng(self.rng_seed);
    }

    /// Run one full learning episode and return the emitted action sequence.
    ///
    /// Runs `iterations` steps with the iteration index as the trial pointer.
    /// Each step appends one entry to the action sequence, the visited-state
    /// sequence, the value-table history, and the action-probability log.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the task and aborts with a
    /// numerical error at the first iteration that produces a non-finite
    /// value or a degenerate distribution.
    pub fn run_episode(&mut self, task: &dyn Task) -> Result<Vec<ActionId>> {
        for iteration in 0..self.iterations {
            let state = self.current_state.clone();
            let action = self.select_action(task, &state)?;
            let (next_state, reward) = task.step(&state, &action, iteration)?;

            let alpha = self.params.learning_rate().at(iteration);
            let gamma = self.params.discount_factor();
            let new_value = self.q_table.update(
                &state,
                &action,
                &next_state,
                task.actions(),
                reward,
                alpha,
                gamma,
            );
            if !new_value.is_finite() {
                return Err(Error::NonFiniteValue {
                    state: state.to_string(),
                    action: action.to_string(),
                    iteration,
                });
            }

            self.value_history.push(self.q_table.clone());
            self.log_policy_snapshot(task)?;
            self.visited_states.push(state);
            self.actions_taken.push(action);
            self.current_state = next_state;
        }

        Ok(self.actions_taken.clone())
    }

    fn select_action(&mut self, task: &dyn Task, state: &StateId) -> Result<ActionId> {
        let legal = task.legal_actions(state);
        if legal.is_empty() {
            return Err(Error::NoLegalActions {
                state: state.to_string(),
            });
        }
        self.policy
            .select_action(&self.q_table, state, legal, &self.params, &mut self.rng)
    }

    /// Append the current policy's log-probability row over every state.
    fn log_policy_snapshot(&mut self, task: &dyn Task) -> Result<()> {
        let mut row = LogProbRow::new();
        for state in task.states() {
            let legal = task.legal_actions(state);
            if legal.is_empty() {
                return Err(Error::NoLegalActions {
                    state: state.to_string(),
                });
            }
            for (action, log_prob) in
                self.policy
                    .log_probabilities(&self.q_table, state, legal, &self.params)?
            {
                row.insert((state.clone(), action), log_prob);
            }
        }
        self.action_log.push(row);
        Ok(())
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Replace the agent's parameter set (the optimizer's move primitive).
    pub fn set_parameters(&mut self, params: ParameterSet) {
        self.params = params;
    }

    /// Capture the agent's current episode state.
    pub fn export_snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            params: self.params.clone(),
            q_table: self.q_table.clone(),
            current_state: self.current_state.clone(),
            actions_taken: self.actions_taken.clone(),
            visited_states: self.visited_states.clone(),
            value_history: self.value_history.clone(),
            action_log: self.action_log.clone(),
        }
    }

    /// Reinstate a previously captured episode state.
    pub fn restore_snapshot(&mut self, snapshot: &AgentSnapshot) {
        self.params = snapshot.params.clone();
        self.q_table = snapshot.q_table.clone();
        self.current_state = snapshot.current_state.clone();
        self.actions_taken = snapshot.actions_taken.clone();
        self.visited_states = snapshot.visited_states.clone();
        self.value_history = snapshot.value_history.clone();
        self.action_log = snapshot.action_log.clone();
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Actions emitted during the last episode, one per iteration.
    pub fn actions_taken(&self) -> &[ActionId] {
        &self.actions_taken
    }

    /// States occupied at each iteration of the last episode.
    pub fn visited_states(&self) -> &[StateId] {
        &self.visited_states
    }

    /// Per-iteration value-table snapshots from the last episode.
    pub fn value_history(&self) -> &[QTable] {
        &self.value_history
    }

    /// Per-iteration action-probability log from the last episode.
    pub fn action_log(&self) -> &[LogProbRow] {
        &self.action_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::LearningRate,
        policy::{EpsilonGreedy, Softmax},
    };

    /// Minimal task: two states, two actions, action "A" always rewards 10
    /// and "B" always rewards -1, states alternate by trial parity.
    struct StaticTask {
        states: Vec<StateId>,
        actions: Vec<ActionId>,
    }

    impl StaticTask {
        fn new() -> Self {
            Self {
                states: vec![StateId::new("s0"), StateId::new("s1")],
                actions: vec![ActionId::new("A"), ActionId::new("B")],
            }
        }
    }

    impl Task for StaticTask {
        fn states(&self) -> &[StateId] {
            &self.states
        }

        fn actions(&self) -> &[ActionId] {
            &self.actions
        }

        fn legal_actions(&self, _state: &StateId) -> &[ActionId] {
            &self.actions
        }

        fn step(&self, _state: &StateId, action: &ActionId, trial: usize) -> Result<(StateId, f64)> {
            let reward = if action.as_str() == "A" { 10.0 } else { -1.0 };
            Ok((self.states[trial % 2].clone(), reward))
        }

        fn num_trials(&self) -> usize {
            40
        }
    }

    fn params(epsilon: f64) -> ParameterSet {
        ParameterSet::new(LearningRate::Constant(0.5), 0.9, epsilon, 2.0).unwrap()
    }

    #[test]
    fn test_episode_records_one_entry_per_iteration() {
        let task = StaticTask::new();
        let mut agent = QAgent::new(
            &task,
            params(0.1),
            Box::new(EpsilonGreedy),
            AgentConfig::new().with_seed(42),
        )
        .unwrap();

        let actions = agent.run_episode(&task).unwrap();
        assert_eq!(actions.len(), 40);
        assert_eq!(agent.visited_states().len(), 40);
        assert_eq!(agent.value_history().len(), 40);
        assert_eq!(agent.action_log().len(), 40);
        // Every log row covers the full states x actions product
        assert!(agent.action_log().iter().all(|row| row.len() == 4));
        assert!(agent.q_table().is_finite());
    }

    #[test]
    fn test_greedy_agent_learns_dominant_action() {
        let task = StaticTask::new();
        let mut agent = QAgent::new(
            &task,
            params(0.0),
            Box::new(EpsilonGreedy),
            AgentConfig::new().with_seed(42),
        )
        .unwrap();

        agent.run_episode(&task).unwrap();
        let dominant = ActionId::new("A");
        for state in task.states() {
            assert_eq!(
                agent.q_table().greedy_action(state, task.actions()),
                Some(dominant.clone()),
                "greedy policy must settle on the always-rewarded action"
            );
        }
    }

    #[test]
    fn test_reset_restores_initial_condition() {
        let task = StaticTask::new();
        let mut agent = QAgent::new(
            &task,
            params(0.3),
            Box::new(Softmax),
            AgentConfig::new().with_seed(7),
        )
        .unwrap();

        agent.run_episode(&task).unwrap();
        agent.reset();

        assert!(agent.actions_taken().is_empty());
        assert!(agent.visited_states().is_empty());
        assert!(agent.value_history().is_empty());
        assert!(agent.action_log().is_empty());
        assert_eq!(agent.q_table().len(), 4);
        assert!(
            agent
                .q_table()
                .entries()
                .iter()
                .all(|(_, _, value)| *value == 0.0)
        );
    }

    #[test]
    fn test_seeded_episodes_are_bit_identical() {
        let task = StaticTask::new();
        let config = AgentConfig::new().with_seed(99);

        let mut first = QAgent::new(&task, params(0.5), Box::new(Softmax), config.clone()).unwrap();
        let mut second = QAgent::new(&task, params(0.5), Box::new(Softmax), config).unwrap();

        let actions_first = first.run_episode(&task).unwrap();
        let actions_second = second.run_episode(&task).unwrap();

        assert_eq!(actions_first, actions_second);
        assert_eq!(first.q_table(), second.q_table());
    }

    #[test]
    fn test_reset_then_rerun_reproduces_episode() {
        let task = StaticTask::new();
        let mut agent = QAgent::new(
            &task,
            params(0.5),
            Box::new(EpsilonGreedy),
            AgentConfig::new().with_seed(4),
        )
        .unwrap();

        let first = agent.run_episode(&task).unwrap();
        let table_first = agent.q_table().clone();
        agent.reset();
        let second = agent.run_episode(&task).unwrap();

        assert_eq!(first, second);
        assert_eq!(&table_first, agent.q_table());
    }

    #[test]
    fn test_zero_learning_rate_leaves_table_unchanged() {
        let task = StaticTask::new();
        let params = ParameterSet::new(LearningRate::Constant(0.0), 0.0, 0.5, 2.0).unwrap();
        let mut agent = QAgent::new(
            &task,
            params,
            Box::new(EpsilonGreedy),
            AgentConfig::new().with_seed(1),
        )
        .unwrap();

        agent.run_episode(&task).unwrap();
        assert!(
            agent
                .q_table()
                .entries()
                .iter()
                .all(|(_, _, value)| *value == 0.0)
        );
    }

    #[test]
    fn test_unknown_initial_state_rejected() {
        let task = StaticTask::new();
        let result = QAgent::new(
            &task,
            params(0.1),
            Box::new(EpsilonGreedy),
            AgentConfig::new().with_initial_state(StateId::new("missing")),
        );
        assert!(matches!(result, Err(Error::UnknownState { .. })));
    }

    #[test]
    fn test_empty_action_space_rejected() {
        let task = StaticTask {
            states: vec![StateId::new("s0")],
            actions: Vec::new(),
        };
        let result = QAgent::new(
            &task,
            params(0.1),
            Box::new(EpsilonGreedy),
            AgentConfig::new(),
        );
        assert!(matches!(result, Err(Error::EmptyActionSpace)));
    }
}
