//! Fixed-delay periodic callbacks
//!
//! [`FixedDelayScheduler`] runs a callback on a background thread, waiting a
//! fixed delay between the end of one run and the start of the next. A slow
//! callback pushes every later run back instead of piling runs up, so at most
//! one callback is ever in flight.

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Handle to a running fixed-delay loop.
///
/// Cloning the handle shares the same loop. The loop ends when [`stop`](Self::stop)
/// is called on any clone, or once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct FixedDelayScheduler {
    inner: Arc<SchedulerInner>,
}

#[derive(Debug)]
struct SchedulerInner {
    delay: Duration,
    // Dropping the sender disconnects the loop's receiver, which ends it
    stop_tx: Mutex<Option<Sender<()>>>,
}

impl FixedDelayScheduler {
    /// Spawn the loop and schedule the first run `delay` from now
    pub fn start<F>(delay: Duration, callback: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(0);

        thread::Builder::new()
            .name("fanout-scheduler".to_string())
            .spawn(move || run_loop(delay, stop_rx, callback))
            .context("Failed to spawn scheduler thread")?;

        debug!(?delay, "scheduler started");

        Ok(Self {
            inner: Arc::new(SchedulerInner {
                delay,
                stop_tx: Mutex::new(Some(stop_tx)),
            }),
        })
    }

    /// Cancel every run that has not started yet.
    ///
    /// A callback that is already running finishes normally. The loop re-checks
    /// for a stop right before each run, so the only run that can still begin
    /// after this returns is one that had already passed that check.
    /// Idempotent, thread safe, and fine to call from inside the callback itself.
    pub fn stop(&self) {
        let mut stop_tx = self
            .inner
            .stop_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if stop_tx.take().is_some() {
            debug!("scheduler stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.inner
            .stop_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

fn run_loop<F>(delay: Duration, stop_rx: Receiver<()>, mut callback: F)
where
    F: FnMut(),
{
    let mut runs = 0u64;

    // The wait starts after the callback returned, so the delay is measured
    // from completion rather than from the previous start.
    loop {
        match stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        // stop() may have landed while the timeout was firing
        if let Err(TryRecvError::Disconnected) = stop_rx.try_recv() {
            break;
        }

        runs += 1;
        trace!(run = runs, "scheduler firing");
        callback();
    }

    trace!(runs, "scheduler loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let scheduler = FixedDelayScheduler::start(Duration::from_secs(60), || {}).unwrap();
        assert!(!scheduler.is_stopped());
        assert_eq!(scheduler.delay(), Duration::from_secs(60));

        scheduler.stop();
        scheduler.stop();
        assert!(scheduler.is_stopped());

        // Clones share the stop state
        let clone = scheduler.clone();
        assert!(clone.is_stopped());
    }
}
