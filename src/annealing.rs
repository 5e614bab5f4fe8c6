//! Simulated annealing
//!
//! The optimizer is composed, not inherited: an [`Annealer`] owns only the
//! schedule and the observer list, and drives any [`AnnealingProblem`]; the
//! problem supplies the move, the energy, and the state snapshot/restore
//! primitives. Swapping the objective (mismatch count, likelihood, anything
//! else) means swapping the problem, never rewriting the loop.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::AnnealObserver,
};

/// Annealing temperature schedule and step budget.
///
/// Temperature decays exponentially from `t_max` to `t_min` across `steps`
/// moves. `updates` is the approximate number of progress reports observers
/// should emit over the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    /// Starting (maximum) temperature
    pub t_max: f64,
    /// Ending (minimum) temperature
    pub t_min: f64,
    /// Number of annealing moves
    pub steps: usize,
    /// Approximate number of progress updates over the run
    pub updates: usize,
}

impl AnnealSchedule {
    /// Create a schedule, validating it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchedule`] unless `t_max >= t_min > 0` and
    /// `steps >= 1`.
    pub fn new(t_max: f64, t_min: f64, steps: usize, updates: usize) -> Result<Self> {
        let schedule = Self {
            t_max,
            t_min,
            steps,
            updates,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check the schedule invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchedule`] describing the violated constraint.
    pub fn validate(&self) -> Result<()> {
        if !self.t_min.is_finite() || self.t_min <= 0.0 {
            return Err(Error::InvalidSchedule {
                message: format!("t_min must be positive, got {}", self.t_min),
            });
        }
        if !self.t_max.is_finite() || self.t_max < self.t_min {
            return Err(Error::InvalidSchedule {
                message: format!(
                    "t_max must be finite and >= t_min, got t_max={} t_min={}",
                    self.t_max, self.t_min
                ),
            });
        }
        if self.steps == 0 {
            return Err(Error::InvalidSchedule {
                message: "steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Temperature at the given step (exponential decay).
    pub fn temperature(&self, step: usize) -> f64 {
        let decay = -(self.t_max / self.t_min).ln();
        self.t_max * (decay * step as f64 / self.steps as f64).exp()
    }
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            t_max: 500.0,
            t_min: 2.5,
            steps: 5000,
            updates: 100,
        }
    }
}

/// The search problem simulated annealing drives.
///
/// The problem owns the mutable search state. Moves here are global jumps (a
/// full re-draw of the searched point) rather than local perturbations;
/// implementations that change this should say so loudly.
pub trait AnnealingProblem {
    /// Captured search state, sufficient to undo a rejected move and to
    /// return the best point found.
    type Snapshot: Clone;

    /// Propose the next candidate (mutates the search state in place).
    fn propose_move(&mut self, rng: &mut StdRng) -> Result<()>;

    /// Evaluate the current candidate. Expensive and possibly stochastic; a
    /// failed evaluation has no comparable energy and must propagate.
    fn energy(&mut self, rng: &mut StdRng) -> Result<f64>;

    /// Capture the current search state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Reinstate a previously captured search state.
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealOutcome<S> {
    /// Lowest-energy state observed (not necessarily the final one)
    pub best_snapshot: S,
    /// Energy of the best state
    pub best_energy: f64,
    /// Energy of the state the run ended on
    pub final_energy: f64,
    /// Number of accepted moves
    pub accepted_moves: usize,
    /// Number of attempted moves
    pub attempted_moves: usize,
}

/// Simulated annealing driver.
pub struct Annealer {
    schedule: AnnealSchedule,
    observers: Vec<Box<dyn AnnealObserver>>,
}

impl Annealer {
    /// Create a driver for the given schedule.
    pub fn new(schedule: AnnealSchedule) -> Self {
        Self {
            schedule,
            observers: Vec::new(),
        }
    }

    /// Add a progress observer.
    pub fn with_observer(mut self, observer: Box<dyn AnnealObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn schedule(&self) -> &AnnealSchedule {
        &self.schedule
    }

    /// Run the annealing loop and return the best state observed.
    ///
    /// Metropolis acceptance: a lower-energy candidate is always accepted, a
    /// higher-energy one with probability `exp(-dE / T)`. Rejected moves are
    /// undone via the problem's snapshot/restore pair.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid schedule before any move
    /// runs, and propagates the first move or energy failure unchanged.
    pub fn run<P: AnnealingProblem>(
        &mut self,
        problem: &mut P,
        rng: &mut StdRng,
    ) -> Result<AnnealOutcome<P::Snapshot>> {
        self.schedule.validate()?;

        let mut energy = problem.energy(rng)?;
        let mut current = problem.snapshot();
        let mut best = current.clone();
        let mut best_energy = energy;
        let mut accepted_moves = 0;

        for observer in &mut self.observers {
            observer.on_anneal_start(self.schedule.steps)?;
        }

        for step in 0..self.schedule.steps {
            let temperature = self.schedule.temperature(step);

            problem.propose_move(rng)?;
            let candidate_energy = problem.energy(rng)?;
            let delta = candidate_energy - energy;

            let accepted = delta <= 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
            if accepted {
                accepted_moves += 1;
                energy = candidate_energy;
                current = problem.snapshot();
                if energy < best_energy {
                    best_energy = energy;
                    best = current.clone();
                }
            } else {
                problem.restore(&current);
            }

            for observer in &mut self.observers {
                observer.on_step(step, temperature, energy, best_energy, accepted)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_anneal_end(best_energy)?;
        }

        problem.restore(&best);
        Ok(AnnealOutcome {
            best_snapshot: best,
            best_energy,
            final_energy: energy,
            accepted_moves,
            attempted_moves: self.schedule.steps,
        })
    }
}
