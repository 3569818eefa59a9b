use super::process::Pid;
use thiserror::Error;

/// Errors raised by a single scheduling run.
///
/// None of these outlive the `run` call that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The policy configuration cannot be simulated (e.g. Round-Robin without a quantum).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No processes were supplied, so per-process averages are undefined.
    #[error("no processes to schedule")]
    EmptyInput,

    /// A process record that the caller should have rejected reached the engine.
    #[error("invalid process record {id}: {reason}")]
    InvalidProcessRecord { id: Pid, reason: String },
}

impl SchedulerError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn invalid_record(id: Pid, reason: impl Into<String>) -> Self {
        Self::InvalidProcessRecord {
            id,
            reason: reason.into(),
        }
    }
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
