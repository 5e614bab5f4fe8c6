//! Task adapter over a trial recording.

use crate::{
    Result,
    error::Error,
    ports::Task,
    recording::Recording,
    types::{ActionId, StateId, reward},
};

/// The recorded choice task.
///
/// State transitions are exogenous: the next state is the trial's schedule
/// label no matter what the agent did. Only the reward consults the action,
/// comparing it to the port the recording marks for that trial. No action
/// masking applies, so every state's legal actions are the full action set.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTask {
    recording: Recording,
}

impl RecordedTask {
    /// Wrap a recording as a task.
    pub fn new(recording: Recording) -> Self {
        Self { recording }
    }

    /// The underlying recording.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }
}

impl Task for RecordedTask {
    fn states(&self) -> &[StateId] {
        self.recording.states()
    }

    fn actions(&self) -> &[ActionId] {
        self.recording.actions()
    }

    fn legal_actions(&self, _state: &StateId) -> &[ActionId] {
        self.recording.actions()
    }

    fn step(&self, _state: &StateId, action: &ActionId, trial: usize) -> Result<(StateId, f64)> {
        let record = self
            .recording
            .trials()
            .get(trial)
            .ok_or(Error::TrialIndexOutOfRange {
                index: trial,
                trials: self.recording.len(),
            })?;

        let earned = if *action == record.port {
            reward::MATCHED
        } else {
            reward::UNMATCHED
        };
        Ok((record.schedule.clone(), earned))
    }

    fn num_trials(&self) -> usize {
        self.recording.len()
    }
}
