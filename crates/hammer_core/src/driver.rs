//! Fan-out / fan-in over a fixed pool of OS threads.
//!
//! The pool is sized to exactly `workers` threads and every thread runs the
//! worker loop once (rayon broadcast), so each worker owns a thread for its
//! whole lifetime. The pool is built scoped: its OS threads are joined, not
//! just signalled to exit, before the call returns.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::info;

use crate::config::HammerConfig;
use crate::error::HammerError;
use crate::transport::{build_request_issuer, RequestIssuer};
use crate::worker::{run_worker, WorkerReport};

/// Structural record of a finished run, one report per joined worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: Vec<WorkerReport>,
}

impl RunSummary {
    pub fn workers_joined(&self) -> usize {
        self.workers.len()
    }

    pub fn total_attempts(&self) -> usize {
        self.workers.iter().map(|report| report.attempts).sum()
    }
}

/// Run the configured transport against the configured target.
pub fn run_hammer(config: &HammerConfig) -> Result<RunSummary, HammerError> {
    run_hammer_with_progress(config, false)
}

/// Like [`run_hammer`], optionally drawing a progress bar over all attempts.
pub fn run_hammer_with_progress(
    config: &HammerConfig,
    show_progress: bool,
) -> Result<RunSummary, HammerError> {
    config.validate()?;
    let issuer = build_request_issuer(config)?;
    run_hammer_with_issuer(config, issuer.as_ref(), show_progress)
}

/// Launch `config.workers` workers sharing `issuer` and wait for all of them.
///
/// Request failures never surface here; only setup errors do.
pub fn run_hammer_with_issuer(
    config: &HammerConfig,
    issuer: &dyn RequestIssuer,
    show_progress: bool,
) -> Result<RunSummary, HammerError> {
    config.validate()?;

    let total = config.total_attempts();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    info!(
        target_url = %config.target_url,
        workers = config.workers,
        iterations_per_worker = config.iterations_per_worker,
        transport = ?config.transport,
        "starting run"
    );
    let started = Instant::now();

    let iterations = config.iterations_per_worker;
    let pb_ref = pb.as_ref();
    let mut workers = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|index| format!("hammer-worker-{index}"))
        .build_scoped(
            |thread: rayon::ThreadBuilder| thread.run(),
            |pool| pool.broadcast(|ctx| run_worker(ctx.index(), iterations, issuer, pb_ref)),
        )?;
    workers.sort_by_key(|report| report.worker_id);

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    let summary = RunSummary { workers };
    info!(
        workers_joined = summary.workers_joined(),
        attempts = summary.total_attempts(),
        elapsed = ?started.elapsed(),
        "run finished"
    );
    Ok(summary)
}
