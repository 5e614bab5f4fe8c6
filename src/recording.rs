//! Recorded-trial input
//!
//! A recording is the fixed trial sequence a subject produced in the choice
//! task, one row per trial. The CSV columns mirror the acquisition system's
//! per-trial fields: the subject's result code, the reward indicator, the
//! chosen port, the odor cue, and the schedule (state) label.

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{ActionId, StateId},
};

/// One recorded trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Subject's result code for the trial (carried through, not interpreted)
    pub choice: String,
    /// 1 if the trial was rewarded, 0 otherwise
    pub rewarded: u8,
    /// Port/action the subject chose
    pub port: ActionId,
    /// Odor cue presented on the trial
    pub odor: String,
    /// Schedule (state) label for the trial
    pub schedule: StateId,
}

impl Trial {
    /// Whether the trial was rewarded.
    pub fn is_rewarded(&self) -> bool {
        self.rewarded != 0
    }
}

/// An ordered trial sequence with its derived state and action sets.
///
/// States are the distinct schedule labels and actions the distinct port
/// labels, both sorted so every consumer sees the same deterministic order.
/// Immutable once constructed; shared read-only by the task adapter and the
/// scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    trials: Vec<Trial>,
    states: Vec<StateId>,
    actions: Vec<ActionId>,
}

impl Recording {
    /// Build a recording from a trial sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRecording`] for an empty trial sequence.
    pub fn new(trials: Vec<Trial>) -> Result<Self> {
        if trials.is_empty() {
            return Err(Error::EmptyRecording);
        }

        let mut states: Vec<StateId> = trials.iter().map(|trial| trial.schedule.clone()).collect();
        states.sort();
        states.dedup();

        let mut actions: Vec<ActionId> = trials.iter().map(|trial| trial.port.clone()).collect();
        actions.sort();
        actions.dedup();

        Ok(Self {
            trials,
            states,
            actions,
        })
    }

    /// Load a recording from a CSV file with a
    /// `choice,rewarded,port,odor,schedule` header.
    ///
    /// # Errors
    ///
    /// Returns I/O errors for unreadable files, CSV errors for malformed
    /// rows, and [`Error::EmptyRecording`] for a file with no trials.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open recording {path:?}"),
            source,
        })?;

        let mut reader = csv::Reader::from_reader(file);
        let trials = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Trial>, _>>()?;
        Self::new(trials)
    }

    /// The trial sequence in recorded order.
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Distinct schedule labels, sorted.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    /// Distinct port labels, sorted.
    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    /// The subject's chosen port per trial, in order.
    pub fn observed_actions(&self) -> Vec<ActionId> {
        self.trials.iter().map(|trial| trial.port.clone()).collect()
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// True if the recording holds no trials (never true post-construction).
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}
