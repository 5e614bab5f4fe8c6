//! Observers for annealing runs
//!
//! Composable progress reporting without coupling the optimizer loop to any
//! output format.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, error::Error, ports::AnnealObserver};

/// Progress bar observer - shows annealing progress and the best energy
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    updates: usize,
    interval: usize,
}

impl ProgressObserver {
    /// Create a progress observer emitting roughly `updates` message
    /// refreshes over the run.
    pub fn new(updates: usize) -> Self {
        Self {
            progress_bar: None,
            updates,
            interval: 1,
        }
    }
}

impl AnnealObserver for ProgressObserver {
    fn on_anneal_start(&mut self, steps: usize) -> Result<()> {
        let pb = ProgressBar::new(steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} steps (best E: {msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.interval = (steps / self.updates.max(1)).max(1);
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_step(
        &mut self,
        step: usize,
        _temperature: f64,
        _energy: f64,
        best_energy: f64,
        _accepted: bool,
    ) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position((step + 1) as u64);
            if step.is_multiple_of(self.interval) {
                pb.set_message(format!("{best_energy}"));
            }
        }
        Ok(())
    }

    fn on_anneal_end(&mut self, best_energy: f64) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{best_energy}"));
        }
        Ok(())
    }
}
