//! Configuration management for fanout
//!
//! This module holds the worker limits an [`Executor`](crate::parallel::Executor)
//! is built from. Values come from the embedded `default-config.toml`, an
//! optional config file and `FANOUT_*` environment variables, see [`loader`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod loader;

pub use loader::ENV_PREFIX;

/// Worker limits for the fan-out executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum number of worker threads (0 = no cap beyond the percentage)
    pub max_threads: usize,

    /// Percentage of logical CPU cores to use (1-100)
    pub thread_percentage: u8,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 100,
        }
    }
}

impl ExecutorConfig {
    /// Calculate the worker bound from the available cores and the configured limits
    ///
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Ensure minimum: max(1, result)
    /// 4. Apply config limit: min(max_threads, result) if max_threads > 0
    /// ```
    pub fn worker_count(&self) -> usize {
        Self::workers_for_cores(num_cpus::get(), self.max_threads, self.thread_percentage)
    }

    fn workers_for_cores(cores: usize, max_threads: usize, thread_percentage: u8) -> usize {
        let workers_by_percentage = std::cmp::max(1, (cores * thread_percentage as usize) / 100);

        if max_threads > 0 {
            std::cmp::min(max_threads, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.thread_percentage == 0 || self.thread_percentage > 100 {
            anyhow::bail!(
                "thread_percentage must be between 1 and 100, got {}",
                self.thread_percentage
            );
        }

        Ok(())
    }
}
