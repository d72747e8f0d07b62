//! Bounded fan-out execution
//!
//! This module runs `length` independent units of work, identified by their
//! index, across a bounded number of worker threads.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Work Distribution**: Pre-fills a bounded crossbeam channel with every index and lets
//!   workers pull from it without blocking
//! - **Cooperative Cancellation**: Checks a lock-free [`CancellationFlag`] and the shared
//!   error list before every unit
//! - **Error Aggregation**: Collects failures from any worker into a [`ConcurrentVec`] and
//!   reduces them into one [`ExecutionError`] after all workers joined
//! - **Panic Isolation**: Turns a panicking unit into a [`WorkerPanic`] error
//!
//! ## What This Module Does NOT Do:
//! - **Ordering**: Units run in no defined order
//! - **Retries**: A failed unit is reported, never re-run
//! - **Preemption**: A running unit is never interrupted, cancellation only stops new ones
//!
//! # Flow
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Queue         │    │   Workers (n)    │    │   Errors        │
//! │                 │───▶│                  │───▶│                 │
//! │ • 0..length     │    │ • try_recv       │    │ • push_back     │
//! │ • filled once   │    │ • check cancel   │    │ • pop_first     │
//! │ • never blocks  │    │ • run unit       │    │ • drain         │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! Termination needs no extra signal: the queue is filled before any worker
//! starts, so a worker seeing it empty knows no more work will ever arrive.
//!
//! # Example Usage
//!
//! ```rust
//! use fanout::parallel::{CancellationFlag, ExecutionError, execute};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let sum = AtomicUsize::new(0);
//! execute(4, 100, None, |index| {
//!     sum.fetch_add(index, Ordering::Relaxed);
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(sum.load(Ordering::Relaxed), 4950);
//!
//! // A raised flag stops workers before they start any unit
//! let cancel = CancellationFlag::new();
//! cancel.cancel();
//! execute(4, 100, Some(&cancel), |_| anyhow::bail!("never runs")).unwrap();
//!
//! // Failures come back as one aggregate error
//! let err = execute(2, 10, None, |index| {
//!     if index == 5 {
//!         anyhow::bail!("bad index {}", index);
//!     }
//!     Ok(())
//! })
//! .unwrap_err();
//! let exec = err.downcast_ref::<ExecutionError>().unwrap();
//! assert_eq!(exec.cause().to_string(), "bad index 5");
//! ```

pub mod cancel;
pub mod core;
pub mod error;
pub mod vec;

// Re-export main types for easier access
pub use cancel::CancellationFlag;
pub use self::core::{Executor, execute, for_each};
pub use error::{ExecutionError, WorkerPanic};
pub use vec::ConcurrentVec;
