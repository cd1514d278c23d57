use std::path::{Path, PathBuf};

use crate::{DriverError, JobConfig, JobError};

/// Terminal result of a worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job ran to completion or hit the configured limit.
    Completed { total: u64 },
    /// The job observed a stop request and halted early.
    Cancelled { total: u64 },
    /// The job aborted on an unrecoverable error.
    Failed { error: JobError },
}

/// The opaque long-running operation driven by the controller.
///
/// Implementations must poll `is_cancelled` often enough that a stop
/// request is honored within a bounded number of processed results, and
/// must report a monotonically non-decreasing count through `on_progress`.
pub trait ScrapeJob: Send {
    fn run(
        &self,
        config: &JobConfig,
        is_cancelled: &dyn Fn() -> bool,
        on_progress: &dyn Fn(u64),
    ) -> JobOutcome;
}

/// Produces a usable browser driver path.
///
/// An explicit non-empty path is returned unchecked; existence is
/// validated later, at first use, by the job itself. An absent path
/// triggers a network-mediated install, and any failure is returned
/// without retry.
pub trait DriverResolver {
    fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, DriverError>;
}
