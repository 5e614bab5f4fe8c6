//! Error types for the qfit crate

use thiserror::Error;

/// Main error type for the qfit crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("task has no states")]
    EmptyStateSpace,

    #[error("task has no actions")]
    EmptyActionSpace,

    #[error("recording contains no trials")]
    EmptyRecording,

    #[error("state '{state}' has no legal actions")]
    NoLegalActions { state: String },

    #[error("unknown state '{state}' (not in the task's state set)")]
    UnknownState { state: String },

    #[error("trial index {index} is out of range (recording has {trials} trials)")]
    TrialIndexOutOfRange { index: usize, trials: usize },

    #[error("sequence length mismatch: expected {expected}, got {got}")]
    SequenceLengthMismatch { expected: usize, got: usize },

    #[error("reference actions require exactly two distinct actions, got {count}")]
    BinaryChoiceRequired { count: usize },

    #[error("parameter '{name}' has invalid value {value}")]
    InvalidParameter { name: String, value: f64 },

    #[error("invalid annealing schedule: {message}")]
    InvalidSchedule { message: String },

    #[error("non-finite value for ({state}, {action}) at iteration {iteration}")]
    NonFiniteValue {
        state: String,
        action: String,
        iteration: usize,
    },

    #[error("degenerate action distribution for state '{state}': {detail}")]
    DegenerateDistribution { state: String, detail: String },

    #[error("no logged probability for ({state}, {action})")]
    MissingLogProbability { state: String, action: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
