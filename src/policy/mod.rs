//! Action-selection policies
//!
//! Two interchangeable implementations of the [`crate::ports::Policy`] port:
//!
//! - **Epsilon-greedy**: explore uniformly with probability epsilon,
//!   otherwise exploit the greedy action with a deterministic tie-break
//! - **Softmax**: sample from a numerically stable Boltzmann distribution
//!   over the state's actions
//!
//! Policies are stateless; hyperparameters come from the agent's
//! [`crate::params::ParameterSet`] and randomness from the agent's stream.

pub mod epsilon_greedy;
pub mod softmax;

pub use epsilon_greedy::EpsilonGreedy;
pub use softmax::Softmax;
