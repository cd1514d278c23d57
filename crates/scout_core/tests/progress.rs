use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use scout_core::{
    ChannelProgressSink, ControllerEvent, DriverError, DriverResolver, JobConfig, JobOutcome,
    ProgressSink, ScrapeJob, TaskController,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

struct StubResolver;

impl DriverResolver for StubResolver {
    fn resolve(&self, _explicit: Option<&Path>) -> Result<PathBuf, DriverError> {
        Ok(PathBuf::from("/stub/driver"))
    }
}

struct ReplayJob {
    reports: Vec<u64>,
}

impl ScrapeJob for ReplayJob {
    fn run(
        &self,
        _config: &JobConfig,
        _is_cancelled: &dyn Fn() -> bool,
        on_progress: &dyn Fn(u64),
    ) -> JobOutcome {
        for &count in &self.reports {
            on_progress(count);
        }
        JobOutcome::Completed {
            total: self.reports.last().copied().unwrap_or(0),
        }
    }
}

#[test]
fn channel_sink_delivers_counts_in_report_order() {
    let (tx, rx) = mpsc::channel();
    let sink = ChannelProgressSink::new(tx);

    for count in [1u64, 2, 2, 5, 9] {
        sink.display(count);
    }

    let mut delivered = Vec::new();
    while let Ok(ControllerEvent::Progress { count }) = rx.try_recv() {
        delivered.push(count);
    }
    assert_eq!(delivered, vec![1, 2, 2, 5, 9]);
}

#[test]
fn final_delivery_equals_last_reported_value() {
    scout_logging::initialize_for_tests();
    let (event_tx, event_rx) = mpsc::channel();
    let controller = TaskController::new(StubResolver, event_tx.clone());

    let reports = vec![1, 2, 2, 5, 9];
    controller
        .start(
            JobConfig::new("hardware stores"),
            ReplayJob {
                reports: reports.clone(),
            },
            ChannelProgressSink::new(event_tx),
        )
        .expect("start");

    let mut last_progress = None;
    loop {
        match event_rx.recv_timeout(RECV_TIMEOUT).expect("event") {
            ControllerEvent::Progress { count } => last_progress = Some(count),
            ControllerEvent::Finished { outcome } => {
                assert_eq!(outcome, JobOutcome::Completed { total: 9 });
                break;
            }
        }
    }

    // Intermediate values may be superseded; the final one may not.
    assert_eq!(last_progress, Some(9));
    assert_eq!(controller.last_count(), 9);
}
