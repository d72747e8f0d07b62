use anyhow::Result;
use crossbeam::channel::{Receiver, bounded};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace, warn};

use super::cancel::CancellationFlag;
use super::error::{ExecutionError, WorkerPanic};
use super::vec::ConcurrentVec;
use crate::config::ExecutorConfig;

/// Run `work` for every index in `0..length` on all logical cores, without
/// external cancellation.
pub fn for_each<F>(length: usize, work: F) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    execute(num_cpus::get(), length, None, work)
}

/// Run `work` for every index in `0..length` on at most `max_workers` threads.
///
/// Indices are handed out in no defined order and each one runs at most once.
/// Workers stop picking up new indices as soon as `cancel` is raised or any
/// unit has failed; units already running are never interrupted.
///
/// Returns `Ok(())` if every started unit succeeded. Otherwise the error is an
/// [`ExecutionError`] holding the first recorded failure as its cause and the
/// others as suppressed. With `length == 1` the unit runs on the calling
/// thread and its error is returned as is.
pub fn execute<F>(
    max_workers: usize,
    length: usize,
    cancel: Option<&CancellationFlag>,
    work: F,
) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    if length == 0 {
        return Ok(());
    }

    if length == 1 {
        return run_unit(&work, 0);
    }

    // Never more workers than items, never fewer than one (e.g. cores / 2 on a single core)
    let workers = max_workers.clamp(1, length);

    let (queue_tx, queue_rx) = bounded(length);
    for index in 0..length {
        queue_tx.send(index)?;
    }
    // One-shot producer: an empty queue now means no more work, ever
    drop(queue_tx);

    let errors = ConcurrentVec::new();

    debug!(workers, length, "starting fan-out");

    crossbeam::thread::scope(|s| {
        for worker_id in 0..workers {
            let ctx = WorkerContext {
                worker_id,
                queue: queue_rx.clone(),
                errors: &errors,
                cancel,
                work: &work,
            };

            s.spawn(move |_| ctx.run());
        }
    })
    .map_err(|_| anyhow::anyhow!("Thread panic occurred during fan-out execution"))?;

    let Some(cause) = errors.pop_first() else {
        debug!(workers, length, "fan-out finished");
        return Ok(());
    };
    let suppressed = errors.drain();

    debug!(
        workers,
        length,
        failures = suppressed.len() + 1,
        "fan-out finished with errors"
    );

    Err(ExecutionError::new(cause, suppressed).into())
}

/// Reusable worker bound, usually built from [`ExecutorConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    max_workers: usize,
}

impl Executor {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(config.worker_count())
    }

    pub fn workers(&self) -> usize {
        self.max_workers
    }

    pub fn execute<F>(&self, length: usize, cancel: Option<&CancellationFlag>, work: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        execute(self.max_workers, length, cancel, work)
    }

    pub fn for_each<F>(&self, length: usize, work: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        self.execute(length, None, work)
    }
}

impl Default for Executor {
    /// One worker per logical core
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, F> {
    worker_id: usize,
    queue: Receiver<usize>,
    errors: &'a ConcurrentVec<anyhow::Error>,
    cancel: Option<&'a CancellationFlag>,
    work: &'a F,
}

impl<F> WorkerContext<'_, F>
where
    F: Fn(usize) -> Result<()>,
{
    fn run(self) {
        let mut completed = 0usize;

        // try_recv never blocks: Empty and Disconnected both mean the queue is drained
        while let Ok(index) = self.queue.try_recv() {
            // Dequeued but never started once a stop was requested
            if CancellationFlag::is_set(self.cancel) || !self.errors.is_empty() {
                trace!(worker_id = self.worker_id, index, completed, "worker stopping early");
                return;
            }

            if let Err(err) = run_unit(self.work, index) {
                debug!(worker_id = self.worker_id, index, error = %err, "work unit failed");
                self.errors.push_back(err);
                return;
            }

            completed += 1;
        }

        trace!(worker_id = self.worker_id, completed, "worker found queue empty");
    }
}

fn run_unit<F>(work: &F, index: usize) -> Result<()>
where
    F: Fn(usize) -> Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| work(index))) {
        Ok(result) => result,
        Err(payload) => {
            let worker_panic = WorkerPanic::from_payload(index, payload);
            warn!(index, message = %worker_panic.message, "work unit panicked");
            Err(worker_panic.into())
        }
    }
}
