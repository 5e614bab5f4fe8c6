//! Value table for tabular Q-learning

use std::collections::HashMap;

use crate::types::{ActionId, StateId};

/// Value table mapping (state, action) pairs to value estimates
///
/// The table is dense: after initialization every pair in states × actions is
/// present, so lookups never depend on which pairs happen to have been
/// visited. Resetting zeroes the values in place and is how the optimizer
/// restarts the agent between annealing moves.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: HashMap<(StateId, ActionId), f64>,
}

impl QTable {
    /// Create a table with every (state, action) pair initialized to zero.
    pub fn initialize(states: &[StateId], actions: &[ActionId]) -> Self {
        let mut values = HashMap::with_capacity(states.len() * actions.len());
        for state in states {
            for action in actions {
                values.insert((state.clone(), action.clone()), 0.0);
            }
        }
        Self { values }
    }

    /// Get the value for a state-action pair (0.0 for unknown pairs).
    pub fn get(&self, state: &StateId, action: &ActionId) -> f64 {
        *self
            .values
            .get(&(state.clone(), action.clone()))
            .unwrap_or(&0.0)
    }

    /// Set the value for a state-action pair.
    pub fn set(&mut self, state: StateId, action: ActionId, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Maximum value over the given actions in a state.
    pub fn max_value(&self, state: &StateId, actions: &[ActionId]) -> f64 {
        actions
            .iter()
            .map(|action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest value in a state.
    ///
    /// Ties resolve to the first maximum in `actions` order
    /// (first-encountered-wins), so greedy selection is deterministic for a
    /// fixed table and action order.
    pub fn greedy_action(&self, state: &StateId, actions: &[ActionId]) -> Option<ActionId> {
        let mut best: Option<(&ActionId, f64)> = None;
        for action in actions {
            let value = self.get(state, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action.clone())
    }

    /// Q-learning update: off-policy, bootstrapped on the greedy successor
    /// value.
    ///
    /// `Q(s,a) ← (1 - α) Q(s,a) + α (r + γ max_a' Q(s',a'))`
    ///
    /// Returns the new value so the caller can verify finiteness with the
    /// iteration context in hand.
    pub fn update(
        &mut self,
        state: &StateId,
        action: &ActionId,
        next_state: &StateId,
        next_actions: &[ActionId],
        reward: f64,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let old_value = self.get(state, action);
        let best_next = self.max_value(next_state, next_actions);
        let new_value = (1.0 - alpha) * old_value + alpha * (reward + gamma * best_next);
        self.set(state.clone(), action.clone(), new_value);
        new_value
    }

    /// Reset every value to zero, keeping the key set intact.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            *value = 0.0;
        }
    }

    /// True if every stored value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.values().all(|value| value.is_finite())
    }

    /// Number of (state, action) pairs stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the table holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All entries in sorted key order, for reports and display.
    pub fn entries(&self) -> Vec<(StateId, ActionId, f64)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|((state, action), value)| (state.clone(), action.clone(), *value))
            .collect();
        entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> (Vec<StateId>, Vec<ActionId>) {
        let states = vec![StateId::new("2"), StateId::new("3")];
        let actions = vec![ActionId::new("1"), ActionId::new("8")];
        (states, actions)
    }

    #[test]
    fn test_initialization_is_dense_and_zero() {
        let (states, actions) = labels();
        let table = QTable::initialize(&states, &actions);
        assert_eq!(table.len(), 4);
        for state in &states {
            for action in &actions {
                assert_eq!(table.get(state, action), 0.0);
            }
        }
    }

    #[test]
    fn test_set_get() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        table.set(states[0].clone(), actions[1].clone(), 1.5);
        assert_eq!(table.get(&states[0], &actions[1]), 1.5);
        assert_eq!(table.get(&states[0], &actions[0]), 0.0);
    }

    #[test]
    fn test_max_value() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        table.set(states[0].clone(), actions[0].clone(), 0.5);
        table.set(states[0].clone(), actions[1].clone(), 1.5);
        assert_eq!(table.max_value(&states[0], &actions), 1.5);
    }

    #[test]
    fn test_greedy_action_breaks_ties_by_action_order() {
        let (states, actions) = labels();
        let table = QTable::initialize(&states, &actions);
        // All-zero table: the first action in declared order wins
        assert_eq!(
            table.greedy_action(&states[0], &actions),
            Some(actions[0].clone())
        );
    }

    #[test]
    fn test_greedy_action_picks_maximum() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        table.set(states[0].clone(), actions[1].clone(), 2.0);
        assert_eq!(
            table.greedy_action(&states[0], &actions),
            Some(actions[1].clone())
        );
    }

    #[test]
    fn test_update_rule() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        table.set(states[1].clone(), actions[0].clone(), 1.0);
        table.set(states[1].clone(), actions[1].clone(), 2.0);

        // Q = (1 - 0.5) * 0.0 + 0.5 * (10.0 + 0.99 * 2.0) = 5.99
        let new_value = table.update(
            &states[0], &actions[0], &states[1], &actions, 10.0, 0.5, 0.99,
        );
        assert!((new_value - 5.99).abs() < 1e-9);
        assert_eq!(table.get(&states[0], &actions[0]), new_value);
    }

    #[test]
    fn test_update_with_zero_alpha_and_gamma_is_noop() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        for _ in 0..100 {
            table.update(&states[0], &actions[0], &states[1], &actions, 10.0, 0.0, 0.0);
        }
        for state in &states {
            for action in &actions {
                assert_eq!(table.get(state, action), 0.0);
            }
        }
    }

    #[test]
    fn test_reset_restores_zeros_and_keys() {
        let (states, actions) = labels();
        let mut table = QTable::initialize(&states, &actions);
        table.update(&states[0], &actions[0], &states[1], &actions, 10.0, 0.5, 0.9);
        table.reset();
        assert_eq!(table.len(), 4);
        assert!(table.entries().iter().all(|(_, _, value)| *value == 0.0));
    }

    #[test]
    fn test_entries_sorted() {
        let (states, actions) = labels();
        let table = QTable::initialize(&states, &actions);
        let entries = table.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].0, states[0]);
        assert_eq!(entries[0].1, actions[0]);
        assert_eq!(entries[3].0, states[1]);
        assert_eq!(entries[3].1, actions[1]);
    }
}
