//! Adapters implementing the domain ports.

pub mod recorded_task;

pub use recorded_task::RecordedTask;
