//! CLI infrastructure for the qfit toolkit
//!
//! This module provides the command-line interface for fitting behavioral
//! models to recorded choice data and for simulating single episodes with
//! explicit hyperparameters.

pub mod commands;
pub mod output;
