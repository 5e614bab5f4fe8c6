//! Policy port - pluggable action selection
//!
//! A policy maps a state and the current value table to an action choice and
//! to a probability distribution over the state's actions. Keeping selection
//! behind this trait lets new policies be added without touching the
//! value-update logic: the agent drives the episode, the policy only decides.

use rand::rngs::StdRng;

use crate::{
    Result,
    agent::QTable,
    params::ParameterSet,
    types::{ActionId, StateId},
};

/// Policy trait - action selection and its probability log
///
/// Implementations must be deterministic given the value table, parameters,
/// and RNG state; all randomness flows through the supplied generator so that
/// seeded runs reproduce bit-identically.
pub trait Policy: Send {
    /// Name used in reports and CLI output.
    fn name(&self) -> &str;

    /// Select an action for `state` among `legal` actions.
    ///
    /// `legal` is guaranteed non-empty by the caller.
    ///
    /// # Errors
    ///
    /// Returns a numerical error if the selection distribution degenerates
    /// (non-finite weights or a zero-sum denominator).
    fn select_action(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
        rng: &mut StdRng,
    ) -> Result<ActionId>;

    /// Natural-log probabilities of every legal action in `state` under the
    /// current policy.
    ///
    /// The returned pairs preserve the order of `legal`. Probabilities must
    /// sum to 1 within floating-point tolerance.
    fn log_probabilities(
        &self,
        table: &QTable,
        state: &StateId,
        legal: &[ActionId],
        params: &ParameterSet,
    ) -> Result<Vec<(ActionId, f64)>>;
}
