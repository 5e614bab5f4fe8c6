//! Agent hyperparameters and their prior distributions.
//!
//! A [`ParameterSet`] bundles everything the optimizer searches over. The set
//! is mutated only through validating setters or a full re-draw from the
//! priors, never by partial in-place arithmetic, so a set that exists is a
//! set whose invariants hold.

use rand::{Rng, rngs::StdRng};
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean of the exponential prior on `inverse_temperature` and `sigma`.
const EXPONENTIAL_PRIOR_MEAN: f64 = 5.0;

/// Learning rate as a pure function of the iteration index.
///
/// Supports decay schedules: `alpha` is re-evaluated every iteration, so a
/// `Decay` schedule shrinks the step size as the episode progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LearningRate {
    /// Fixed rate for the whole episode.
    Constant(f64),
    /// `initial / (1 + rate * iteration)` hyperbolic decay.
    Decay { initial: f64, rate: f64 },
}

impl LearningRate {
    /// Evaluate the learning rate at the given iteration.
    pub fn at(&self, iteration: usize) -> f64 {
        match self {
            LearningRate::Constant(alpha) => *alpha,
            LearningRate::Decay { initial, rate } => initial / (1.0 + rate * iteration as f64),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            LearningRate::Constant(alpha) => check_probability("learning_rate", *alpha),
            LearningRate::Decay { initial, rate } => {
                check_probability("learning_rate.initial", *initial)?;
                if rate.is_finite() && *rate >= 0.0 {
                    Ok(())
                } else {
                    Err(Error::InvalidParameter {
                        name: "learning_rate.rate".to_string(),
                        value: *rate,
                    })
                }
            }
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

/// Hyperparameters of the learning agent.
///
/// `delta` and `sigma` are reserved for extended policies and are carried
/// through sampling and reports without being consumed by the built-in
/// policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    learning_rate: LearningRate,
    discount_factor: f64,
    exploration_prob: f64,
    inverse_temperature: f64,
    delta: f64,
    sigma: f64,
}

impl ParameterSet {
    /// Create a parameter set with explicit values.
    ///
    /// `delta` and `sigma` take neutral defaults; use the setters to change
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any probability-like field is
    /// outside `[0, 1]` or `inverse_temperature` is not strictly positive.
    pub fn new(
        learning_rate: LearningRate,
        discount_factor: f64,
        exploration_prob: f64,
        inverse_temperature: f64,
    ) -> Result<Self> {
        learning_rate.validate()?;
        check_probability("discount_factor", discount_factor)?;
        check_probability("exploration_prob", exploration_prob)?;
        check_positive("inverse_temperature", inverse_temperature)?;
        Ok(Self {
            learning_rate,
            discount_factor,
            exploration_prob,
            inverse_temperature,
            delta: 0.5,
            sigma: EXPONENTIAL_PRIOR_MEAN,
        })
    }

    /// Draw a fresh parameter set from the prior distributions.
    ///
    /// Uniform `[0, 1]` priors on the probability-like fields, exponential
    /// priors (mean 5) on `inverse_temperature` and `sigma`. Every draw
    /// satisfies the construction invariants, so sampling cannot produce an
    /// out-of-range set.
    pub fn sample(rng: &mut StdRng) -> Self {
        let exponential = Exp::new(1.0 / EXPONENTIAL_PRIOR_MEAN).expect("positive rate");
        Self {
            learning_rate: LearningRate::Constant(rng.random::<f64>()),
            discount_factor: rng.random::<f64>(),
            exploration_prob: rng.random::<f64>(),
            inverse_temperature: exponential.sample(rng),
            delta: rng.random::<f64>(),
            sigma: exponential.sample(rng),
        }
    }

    /// Replace every field with a fresh draw from the priors.
    pub fn resample(&mut self, rng: &mut StdRng) {
        *self = Self::sample(rng);
    }

    pub fn learning_rate(&self) -> &LearningRate {
        &self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn exploration_prob(&self) -> f64 {
        self.exploration_prob
    }

    pub fn inverse_temperature(&self) -> f64 {
        self.inverse_temperature
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Set the learning rate schedule.
    pub fn set_learning_rate(&mut self, learning_rate: LearningRate) -> Result<()> {
        learning_rate.validate()?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Set the discount factor.
    pub fn set_discount_factor(&mut self, gamma: f64) -> Result<()> {
        check_probability("discount_factor", gamma)?;
        self.discount_factor = gamma;
        Ok(())
    }

    /// Set the exploration probability.
    pub fn set_exploration_prob(&mut self, epsilon: f64) -> Result<()> {
        check_probability("exploration_prob", epsilon)?;
        self.exploration_prob = epsilon;
        Ok(())
    }

    /// Set the softmax inverse temperature.
    pub fn set_inverse_temperature(&mut self, beta: f64) -> Result<()> {
        check_positive("inverse_temperature", beta)?;
        self.inverse_temperature = beta;
        Ok(())
    }
}
