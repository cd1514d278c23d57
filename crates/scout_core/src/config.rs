use std::path::PathBuf;

use serde::Serialize;

/// Cap applied when the caller asks for "all results" (`limit == -1`).
pub const DEFAULT_RESULT_CAP: u64 = 500;

/// Immutable snapshot of every tunable for a single task.
///
/// Built once per start call; the worker closes over it and nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobConfig {
    /// Search query text.
    pub query: String,
    /// Maximum number of results to collect; `-1` means "use the default cap".
    pub limit: i64,
    /// Replacement text for fields a listing does not expose.
    pub unavailable_text: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Seconds to wait for the result feed to render before giving up.
    pub wait_secs: u64,
    /// Host extensions to try, in order, when the default host yields nothing.
    pub suggested_ext: Vec<String>,
    /// Directory receiving the CSV and manifest outputs.
    pub output_dir: PathBuf,
    /// Explicit browser executable path; resolved by the controller when absent.
    pub driver_path: Option<PathBuf>,
}

impl JobConfig {
    /// Snapshot with the stock defaults for everything but the query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: -1,
            unavailable_text: "Not Available".to_string(),
            headless: true,
            wait_secs: 15,
            suggested_ext: Vec::new(),
            output_dir: PathBuf::from("./CSV_FILES"),
            driver_path: None,
        }
    }

    /// The concrete result cap after resolving the `-1` sentinel.
    pub fn effective_limit(&self) -> u64 {
        if self.limit < 0 {
            DEFAULT_RESULT_CAP
        } else {
            self.limit as u64
        }
    }

    /// Finalize the snapshot with the resolved driver path.
    pub(crate) fn with_driver_path(mut self, path: PathBuf) -> Self {
        self.driver_path = Some(path);
        self
    }
}
