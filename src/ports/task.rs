//! Task port - the discrete state/action space and trial-indexed oracle
//!
//! A task exposes a finite state/action space plus a reward/transition oracle
//! indexed by trial number. The recorded environment is *not* an interactive
//! simulator: the next state is read from the recording's per-trial schedule
//! regardless of which action was taken, and only the reward depends on the
//! chosen action. Implementations must preserve this asymmetry.

use crate::{
    Result,
    types::{ActionId, StateId},
};

/// Task trait - finite state/action space with a trial-indexed step oracle
///
/// Shared read-only by the agent and the scorer; a task is constructed once
/// from a recording and never mutated afterwards.
pub trait Task {
    /// All states of the task, in a fixed deterministic order.
    fn states(&self) -> &[StateId];

    /// All actions of the task, in a fixed deterministic order.
    ///
    /// This order is the tie-break order for greedy action selection.
    fn actions(&self) -> &[ActionId];

    /// The actions permitted in `state`.
    ///
    /// Must be a non-empty subset of [`Task::actions`] for every reachable
    /// state; may be the full action set when no masking applies.
    fn legal_actions(&self, state: &StateId) -> &[ActionId];

    /// Advance one step: look up `(next_state, reward)` for the given trial.
    ///
    /// The reward depends on whether `action` matches the trial's recorded
    /// rewarded action; `next_state` is the trial's scheduled state and is
    /// independent of `action`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TrialIndexOutOfRange`] if `trial` is past the
    /// end of the recording.
    fn step(&self, state: &StateId, action: &ActionId, trial: usize) -> Result<(StateId, f64)>;

    /// Number of recorded trials (the natural episode length).
    fn num_trials(&self) -> usize;
}
