use thiserror::Error;

/// Why a start call was rejected. Both variants are reported synchronously
/// and leave the controller idle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("a task is already running")]
    AlreadyRunning,
    #[error("query must not be empty")]
    EmptyQuery,
    #[error(transparent)]
    DriverUnavailable(#[from] DriverError),
}

/// Driver resolution failed; carries the underlying reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("driver unavailable: {reason}")]
pub struct DriverError {
    pub reason: String,
}

impl DriverError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure reported by a finished worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct JobError {
    pub message: String,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
