use std::sync::mpsc;

use crate::JobOutcome;

/// Event relayed from the worker context to the interactive context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Latest result count reported by the worker. Later values supersede
    /// earlier ones; only the final one is guaranteed to be observed.
    Progress { count: u64 },
    /// The worker finished and the controller returned to idle.
    Finished { outcome: JobOutcome },
}

/// Anything capable of presenting a progress count.
///
/// `display` is invoked from the worker context; implementations that
/// render on another context must marshal the value there themselves,
/// the way [`ChannelProgressSink`] does.
pub trait ProgressSink: Send + Sync {
    fn display(&self, count: u64);
}

/// Progress sink that forwards counts over a channel, to be drained on
/// the presentation layer's own loop.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<ControllerEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<ControllerEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn display(&self, count: u64) {
        let _ = self.tx.send(ControllerEvent::Progress { count });
    }
}
