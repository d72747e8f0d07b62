//! # fanout - Bounded fan-out execution for Rust
//!
//! Run `length` independent units of work across a bounded pool of threads,
//! stop early on the first failure or on an external cancellation signal, and
//! get every failure back as one aggregate error.
//!
//! ## Features
//!
//! - **Bounded Workers**: Never more threads than work items, never fewer than one
//! - **Cooperative Cancellation**: Lock-free [`CancellationFlag`] checked before every unit
//! - **Error Aggregation**: First failure as cause, the rest kept as suppressed context
//! - **Panic Isolation**: A panicking unit becomes a [`WorkerPanic`](parallel::WorkerPanic) error
//! - **Configurable**: Worker limits from TOML/JSON/YAML files and `FANOUT_*` environment variables
//! - **Fixed-Delay Scheduling**: Periodic callbacks with delay measured from completion
//!
//! ## Quick Start
//!
//! ```rust
//! use fanout::{CancellationFlag, execute, for_each};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let processed = AtomicUsize::new(0);
//! for_each(1000, |_index| {
//!     processed.fetch_add(1, Ordering::Relaxed);
//!     Ok(())
//! })?;
//! assert_eq!(processed.load(Ordering::Relaxed), 1000);
//!
//! let cancel = CancellationFlag::new();
//! execute(4, 1000, Some(&cancel), |index| {
//!     if index == 10 {
//!         cancel.cancel();
//!     }
//!     Ok(())
//! })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod parallel;
pub mod scheduler;

pub use config::ExecutorConfig;
pub use parallel::{
    CancellationFlag, ConcurrentVec, ExecutionError, Executor, WorkerPanic, execute, for_each,
};
pub use scheduler::FixedDelayScheduler;

/// Result type alias for fanout operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
