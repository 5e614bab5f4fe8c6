//! Epsilon-greedy action selection

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    agent::QTable,
    error::{Error, Result},
    params::ParameterSet,
    ports::Policy,
    types::{ActionId, StateId},
};

/// Epsilon-greedy policy
///
/// With probability `exploration_prob`, choose uniformly among the legal
/// actions; otherwise choose the highest-valued action, ties resolving to the
/// first maximum in action order (see [`QTable::greedy_action`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct EpsilonGreedy;

impl EpsilonGreedy {
    /// Create a new epsilon-greedy policy.
    pub fn new() -> Self {
        Self
    }
}

impl Policy for EpsilonGreedy {
    fn name(&self) -> &str {
        "epsilon-greedy"
    }

    fn select_action(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
        rng: &mut StdRng,
    ) -> Result<ActionId> {
        let chosen = if rng.random::<f64>() < params.exploration_prob() {
            legal.choose(rng).cloned()
        } else {
            table.greedy_action(state, legal)
        };
        chosen.ok_or_else(|| Error::NoLegalActions {
            state: state.to_string(),
        })
    }

    fn log_probabilities(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
    ) -> Result<Vec<(ActionId, f64)>> {
        let greedy = table
            .greedy_action(state, legal)
            .ok_or_else(|| Error::NoLegalActions {
                state: state.to_string(),
            })?;

        let epsilon = params.exploration_prob();
        let explore_mass = epsilon / legal.len() as f64;
        Ok(legal
            .iter()
            .map(|action| {
                let prob = if *action == greedy {
                    explore_mass + (1.0 - epsilon)
                } else {
                    explore_mass
                };
                (action.clone(), prob.ln())
            })
            .collect())
    }
}
