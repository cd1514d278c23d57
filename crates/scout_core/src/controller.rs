use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use scout_logging::{scout_error, scout_info};

use crate::{
    ControllerEvent, DriverResolver, JobConfig, JobOutcome, ProgressSink, ScrapeJob, TaskError,
};

/// Lifecycle of the single background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Idle,
    Running,
    StopRequested,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Idle => write!(f, "idle"),
            TaskState::Running => write!(f, "running"),
            TaskState::StopRequested => write!(f, "stopping"),
        }
    }
}

/// Owns the lifecycle of at most one background task.
///
/// The only component allowed to spawn the worker or flip the cancellation
/// flag. State mutations are serialized through one mutex; the flag is a
/// one-way flip per task; the progress counter has a single writer (the
/// active worker) and follows last-write-wins.
pub struct TaskController<R> {
    resolver: R,
    events: mpsc::Sender<ControllerEvent>,
    state: Arc<Mutex<TaskState>>,
    cancel: Arc<AtomicBool>,
    last_count: Arc<AtomicU64>,
}

impl<R: DriverResolver> TaskController<R> {
    /// Controller delivering terminal [`ControllerEvent::Finished`] events
    /// through `events`. Progress flows through the sink given per start.
    pub fn new(resolver: R, events: mpsc::Sender<ControllerEvent>) -> Self {
        Self {
            resolver,
            events,
            state: Arc::new(Mutex::new(TaskState::Idle)),
            cancel: Arc::new(AtomicBool::new(false)),
            last_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the background task.
    ///
    /// Rejects an empty query and a second start while a task is active,
    /// with no side effects. Resolves the driver synchronously before
    /// spawning; a resolution failure leaves the controller idle. This is
    /// the one call that may block the interactive context on the network
    /// (when no explicit driver path was given).
    pub fn start<J, S>(&self, config: JobConfig, job: J, sink: S) -> Result<(), TaskError>
    where
        J: ScrapeJob + 'static,
        S: ProgressSink + 'static,
    {
        if config.query.trim().is_empty() {
            return Err(TaskError::EmptyQuery);
        }
        if self.is_running() {
            return Err(TaskError::AlreadyRunning);
        }

        let driver = self.resolver.resolve(config.driver_path.as_deref())?;
        let config = config.with_driver_path(driver);

        {
            // Re-check under the lock: resolution ran without it.
            let mut state = self.state.lock().expect("task state lock");
            if *state != TaskState::Idle {
                return Err(TaskError::AlreadyRunning);
            }
            self.cancel.store(false, Ordering::SeqCst);
            self.last_count.store(0, Ordering::SeqCst);
            *state = TaskState::Running;
        }

        scout_info!(
            "starting task query={:?} limit={}",
            config.query,
            config.effective_limit()
        );

        let state = Arc::clone(&self.state);
        let cancel = Arc::clone(&self.cancel);
        let counter = Arc::clone(&self.last_count);
        let events = self.events.clone();
        thread::spawn(move || {
            let is_cancelled = || cancel.load(Ordering::SeqCst);
            let on_progress = |count: u64| {
                counter.store(count, Ordering::SeqCst);
                sink.display(count);
            };
            let outcome = job.run(&config, &is_cancelled, &on_progress);

            // Unconditional: success, cancellation, and failure all reach Idle.
            *state.lock().expect("task state lock") = TaskState::Idle;
            match &outcome {
                JobOutcome::Completed { total } => {
                    scout_info!("task completed with {} results", total);
                }
                JobOutcome::Cancelled { total } => {
                    scout_info!("task cancelled after {} results", total);
                }
                JobOutcome::Failed { error } => {
                    scout_error!("task failed: {}", error);
                }
            }
            let _ = events.send(ControllerEvent::Finished { outcome });
        });

        Ok(())
    }

    /// Advisory stop. Sets the cancellation flag for a running task and
    /// never blocks waiting for the worker; idle is a no-op.
    pub fn request_stop(&self) {
        let mut state = self.state.lock().expect("task state lock");
        if *state == TaskState::Running {
            self.cancel.store(true, Ordering::SeqCst);
            *state = TaskState::StopRequested;
            scout_info!("stop requested");
        }
    }

    /// Point-in-time read of whether a task is active.
    pub fn is_running(&self) -> bool {
        self.state() != TaskState::Idle
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.lock().expect("task state lock")
    }

    /// Last count reported by the worker (last-write-wins).
    pub fn last_count(&self) -> u64 {
        self.last_count.load(Ordering::SeqCst)
    }
}
