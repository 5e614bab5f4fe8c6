//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discrete task state label.
///
/// States are driven by the recording's trial schedule, not by the agent's
/// actions, so a state is nothing more than a validated label. Keeping it a
/// newtype prevents states and actions from being swapped in `(state, action)`
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    /// Create a new state label.
    pub fn new(label: impl Into<String>) -> Self {
        StateId(label.into())
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(label: &str) -> Self {
        StateId::new(label)
    }
}

/// A discrete action label (a choice port in the recorded task).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Create a new action label.
    pub fn new(label: impl Into<String>) -> Self {
        ActionId(label.into())
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActionId {
    fn from(label: &str) -> Self {
        ActionId::new(label)
    }
}

/// Reward values for the recorded task.
///
/// Only the reward depends on the chosen action; the state transition is read
/// from the trial schedule regardless of the action.
pub mod reward {
    /// Reward when the chosen action matches the recorded rewarded port.
    pub const MATCHED: f64 = 10.0;

    /// Reward for any other action.
    pub const UNMATCHED: f64 = -1.0;
}

/// Number of fitted hyperparameters, used by the AIC score.
pub const FITTED_PARAMETER_COUNT: usize = 3;
