use indicatif::ProgressBar;
use tracing::{debug, trace};

use crate::transport::RequestIssuer;

/// What one worker did: its pool index and how many requests it attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub attempts: usize,
}

/// Issue exactly `iterations` requests, discarding every outcome.
///
/// There is no retry and no early exit: a failed request still counts as one
/// completed iteration.
pub fn run_worker(
    worker_id: usize,
    iterations: usize,
    issuer: &dyn RequestIssuer,
    progress: Option<&ProgressBar>,
) -> WorkerReport {
    let mut attempts = 0;
    for iteration in 0..iterations {
        if let Err(err) = issuer.issue() {
            debug!(worker_id, iteration, error = %err, "request failed; discarded");
        } else {
            trace!(worker_id, iteration, "request issued");
        }
        attempts += 1;
        if let Some(bar) = progress {
            bar.inc(1);
        }
    }
    WorkerReport {
        worker_id,
        attempts,
    }
}
