//! CLI commands

pub mod fit;
pub mod simulate;

use clap::ValueEnum;

use crate::{
    policy::{EpsilonGreedy, Softmax},
    ports::Policy,
};

/// Action-selection policy selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyChoice {
    /// Explore uniformly with probability epsilon, otherwise exploit
    EpsilonGreedy,
    /// Sample from a Boltzmann distribution over action values
    Softmax,
}

impl PolicyChoice {
    /// Build the chosen policy.
    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyChoice::EpsilonGreedy => Box::new(EpsilonGreedy),
            PolicyChoice::Softmax => Box::new(Softmax),
        }
    }
}

impl std::fmt::Display for PolicyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyChoice::EpsilonGreedy => write!(f, "epsilon-greedy"),
            PolicyChoice::Softmax => write!(f, "softmax"),
        }
    }
}
