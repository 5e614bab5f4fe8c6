//! Softmax (Boltzmann) action selection

use rand::rngs::StdRng;

use crate::{
    agent::QTable,
    error::{Error, Result},
    params::ParameterSet,
    ports::Policy,
    types::{ActionId, StateId},
    utils::weighted_sample,
};

/// Softmax policy
///
/// Weights each legal action by `exp((Q(s,a) - m) * beta)` where `m` is the
/// state's maximum value. Subtracting the maximum before exponentiating keeps
/// the weights in `(0, 1]` and the denominator at least 1, which is what
/// protects the distribution against overflow and underflow; do not remove
/// it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Softmax;

impl Softmax {
    /// Create a new softmax policy.
    pub fn new() -> Self {
        Self
    }

    fn probabilities(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
    ) -> Result<Vec<(ActionId, f64)>> {
        let beta = params.inverse_temperature();
        let max_value = table.max_value(state, legal);

        let weights: Vec<(ActionId, f64)> = legal
            .iter()
            .map(|action| {
                let weight = ((table.get(state, action) - max_value) * beta).exp();
                (action.clone(), weight)
            })
            .collect();

        let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::DegenerateDistribution {
                state: state.to_string(),
                detail: format!("weight sum is {total}"),
            });
        }

        let probs: Vec<(ActionId, f64)> = weights
            .into_iter()
            .map(|(action, weight)| (action, weight / total))
            .collect();
        if probs.iter().any(|(_, prob)| !prob.is_finite()) {
            return Err(Error::DegenerateDistribution {
                state: state.to_string(),
                detail: "non-finite probability".to_string(),
            });
        }

        Ok(probs)
    }
}

impl Policy for Softmax {
    fn name(&self) -> &str {
        "softmax"
    }

    fn select_action(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
        rng: &mut StdRng,
    ) -> Result<ActionId> {
        let probs = self.probabilities(table, state, legal, params)?;
        weighted_sample(rng, &probs).ok_or_else(|| Error::NoLegalActions {
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
        Ok(self
            .probabilities(table, state, legal, params)?
            .into_iter()
            .map(|(action, prob)| (action, prob.ln()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::params::LearningRate;

    fn setup() -> (QTable, Vec<StateId>, Vec<ActionId>) {
        let states = vec![StateId::new("s")];
        let actions = vec![
            ActionId::new("a"),
            ActionId::new("b"),
            ActionId::new("c"),
        ];
        (QTable::initialize(&states, &actions), states, actions)
    }

    fn params(beta: f64) -> ParameterSet {
        ParameterSet::new(LearningRate::Constant(0.5), 0.9, 0.1, beta).unwrap()
    }

    fn prob_sum(policy: &Softmax, table: &QTable, state: &StateId, actions: &[ActionId], beta: f64) -> f64 {
        policy
            .probabilities(table, state, actions, &params(beta))
            .unwrap()
            .iter()
            .map(|(_, prob)| prob)
            .sum()
    }

    #[test]
    fn test_probabilities_sum_to_one_for_equal_values() {
        let (table, states, actions) = setup();
        let policy = Softmax;
        let sum = prob_sum(&policy, &table, &states[0], &actions, 1.0);
        assert!((sum - 1.0).abs() < 1e-12);

        // Ties: all values equal means exactly uniform
        let probs = policy
            .probabilities(&table, &states[0], &actions, &params(1.0))
            .unwrap();
        for (_, prob) in probs {
            assert!((prob - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one_across_magnitudes() {
        let (mut table, states, actions) = setup();
        table.set(states[0].clone(), actions[0].clone(), 1e9);
        table.set(states[0].clone(), actions[1].clone(), -1e9);
        table.set(states[0].clone(), actions[2].clone(), 0.0);

        let policy = Softmax;
        for beta in [1e-6, 1.0, 1e3] {
            let sum = prob_sum(&policy, &table, &states[0], &actions, beta);
            assert!(
                sum.is_finite() && (sum - 1.0).abs() < 1e-9,
                "sum {sum} at beta {beta}"
            );
        }
    }

    #[test]
    fn test_large_beta_collapses_to_argmax() {
        let (mut table, states, actions) = setup();
        table.set(states[0].clone(), actions[1].clone(), 1.0);

        let policy = Softmax;
        let probs = policy
            .probabilities(&table, &states[0], &actions, &params(1e6))
            .unwrap();
        let argmax_prob = probs
            .iter()
            .find(|(action, _)| *action == actions[1])
            .map(|(_, prob)| *prob)
            .unwrap();
        assert!(argmax_prob > 1.0 - 1e-9);
    }

    #[test]
    fn test_small_beta_approaches_uniform() {
        let (mut table, states, actions) = setup();
        table.set(states[0].clone(), actions[0].clone(), 5.0);
        table.set(states[0].clone(), actions[1].clone(), -3.0);

        let policy = Softmax;
        let probs = policy
            .probabilities(&table, &states[0], &actions, &params(1e-9))
            .unwrap();
        for (_, prob) in probs {
            assert!((prob - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_log_probabilities_exponentiate_to_distribution() {
        let (mut table, states, actions) = setup();
        table.set(states[0].clone(), actions[2].clone(), 0.7);

        let policy = Softmax;
        let log_probs = policy
            .log_probabilities(&table, &states[0], &actions, &params(2.0))
            .unwrap();
        let sum: f64 = log_probs.iter().map(|(_, lp)| lp.exp()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_selection_respects_weights() {
        let (mut table, states, actions) = setup();
        table.set(states[0].clone(), actions[1].clone(), 2.0);

        let policy = Softmax;
        let p = params(3.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut favored = 0;
        let draws = 2000;
        for _ in 0..draws {
            let action = policy
                .select_action(&table, &states[0], &actions, &p, &mut rng)
                .unwrap();
            if action == actions[1] {
                favored += 1;
            }
        }
        assert!(
            favored > draws / 2,
            "high-valued action drawn only {favored}/{draws} times"
        );
    }
}
