//! Behavioral scoring
//!
//! Compares an agent's emitted action sequence against the recording. The
//! optimization objective is the raw mismatch count against the per-trial
//! reference action; log-likelihood and AIC are computed alongside for
//! reporting but are not what the annealer minimizes.

use crate::{
    agent::LogProbRow,
    error::{Error, Result},
    recording::Recording,
    types::{ActionId, FITTED_PARAMETER_COUNT, StateId},
};

/// Reference action per trial.
///
/// A rewarded trial means the subject chose the correct port, so the
/// reference is the recorded port; an unrewarded trial means the correct
/// choice was the other port. The complement is only well defined for a
/// two-action task.
///
/// # Errors
///
/// Returns [`Error::BinaryChoiceRequired`] unless the recording has exactly
/// two distinct actions.
pub fn reference_sequence(recording: &Recording) -> Result<Vec<ActionId>> {
    let actions = recording.actions();
    if actions.len() != 2 {
        return Err(Error::BinaryChoiceRequired {
            count: actions.len(),
        });
    }

    let complement = |port: &ActionId| {
        if *port == actions[0] {
            actions[1].clone()
        } else {
            actions[0].clone()
        }
    };

    Ok(recording
        .trials()
        .iter()
        .map(|trial| {
            if trial.is_rewarded() {
                trial.port.clone()
            } else {
                complement(&trial.port)
            }
        })
        .collect())
}

/// Mismatch-count energy: the number of trials where the agent's action
/// differs from the reference action. Lower is better; 0 means the agent
/// reproduced the reference sequence exactly.
///
/// # Errors
///
/// Returns [`Error::SequenceLengthMismatch`] if the sequences differ in
/// length; a partially run episode has no comparable energy.
pub fn mismatch_count(agent_actions: &[ActionId], reference: &[ActionId]) -> Result<usize> {
    if agent_actions.len() != reference.len() {
        return Err(Error::SequenceLengthMismatch {
            expected: reference.len(),
            got: agent_actions.len(),
        });
    }

    Ok(agent_actions
        .iter()
        .zip(reference)
        .filter(|(agent, reference)| agent != reference)
        .count())
}

/// Log-likelihood of an observed choice sequence under the per-iteration
/// policy log.
///
/// Sums, over trials, the logged log-probability of the observed choice in
/// the state occupied at that trial. `-inf` is a legitimate result: it means
/// the fitted policy assigned zero probability to some observed choice.
///
/// # Errors
///
/// Returns [`Error::SequenceLengthMismatch`] if the three sequences differ in
/// length and [`Error::MissingLogProbability`] if a (state, choice) pair was
/// never logged.
pub fn log_likelihood(
    log: &[LogProbRow],
    states: &[StateId],
    choices: &[ActionId],
) -> Result<f64> {
    if states.len() != log.len() {
        return Err(Error::SequenceLengthMismatch {
            expected: log.len(),
            got: states.len(),
        });
    }
    if choices.len() != log.len() {
        return Err(Error::SequenceLengthMismatch {
            expected: log.len(),
            got: choices.len(),
        });
    }

    let mut total = 0.0;
    for ((row, state), choice) in log.iter().zip(states).zip(choices) {
        let log_prob = row.get(&(state.clone(), choice.clone())).ok_or_else(|| {
            Error::MissingLogProbability {
                state: state.to_string(),
                action: choice.to_string(),
            }
        })?;
        total += log_prob;
    }
    Ok(total)
}

/// Akaike information criterion for a fitted model: `2k - 2 ln(L)`.
pub fn aic(log_likelihood: f64) -> f64 {
    2.0 * FITTED_PARAMETER_COUNT as f64 - 2.0 * log_likelihood
}
