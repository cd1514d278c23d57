//! Scout core: background task lifecycle and the seams to its collaborators.
mod config;
mod controller;
mod error;
mod job;
mod progress;

pub use config::{JobConfig, DEFAULT_RESULT_CAP};
pub use controller::{TaskController, TaskState};
pub use error::{DriverError, JobError, TaskError};
pub use job::{DriverResolver, JobOutcome, ScrapeJob};
pub use progress::{ChannelProgressSink, ControllerEvent, ProgressSink};
