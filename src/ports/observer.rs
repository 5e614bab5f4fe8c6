//! Observer port - abstraction for annealing progress observation
//!
//! Observers can be composed to collect different views of an annealing run
//! (progress bars, acceptance metrics) without coupling the optimizer loop to
//! any particular output format.

use crate::Result;

/// Observer trait for monitoring an annealing run
///
/// # Event Sequence
///
/// 1. `on_anneal_start(steps)` - once before the first move
/// 2. `on_step(step, temperature, energy, best_energy, accepted)` - once per
///    annealing step, after the accept/reject decision
/// 3. `on_anneal_end(best_energy)` - once after the last step
pub trait AnnealObserver: Send {
    /// Called before the first move with the total step budget.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_anneal_start(&mut self, _steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each step's accept/reject decision.
    ///
    /// `energy` is the current (post-decision) energy, `best_energy` the
    /// lowest energy seen so far.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to record step outcomes.
    fn on_step(
        &mut self,
        _step: usize,
        _temperature: f64,
        _energy: f64,
        _best_energy: f64,
        _accepted: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once after the step budget is exhausted.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to finalize output.
    fn on_anneal_end(&mut self, _best_energy: f64) -> Result<()> {
        Ok(())
    }
}
