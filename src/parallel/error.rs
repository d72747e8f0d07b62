use std::any::Any;
use std::fmt;

/// Aggregate failure of a fan-out run.
///
/// `cause` is the first error recorded by any worker, `suppressed` holds the
/// rest in the order workers recorded them. [`source`](std::error::Error::source)
/// returns the cause, so `anyhow::Error::chain` and `root_cause` reach it.
#[derive(Debug)]
pub struct ExecutionError {
    cause: anyhow::Error,
    suppressed: Vec<anyhow::Error>,
}

impl ExecutionError {
    pub fn new(cause: anyhow::Error, suppressed: Vec<anyhow::Error>) -> Self {
        Self { cause, suppressed }
    }

    /// First recorded error
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Every other recorded error
    pub fn suppressed(&self) -> &[anyhow::Error] {
        &self.suppressed
    }

    /// Total number of collected errors, cause included
    pub fn error_count(&self) -> usize {
        1 + self.suppressed.len()
    }

    pub fn into_parts(self) -> (anyhow::Error, Vec<anyhow::Error>) {
        (self.cause, self.suppressed)
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot execute: {}", self.cause)?;
        if !self.suppressed.is_empty() {
            write!(f, " (+{} suppressed)", self.suppressed.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + 'static) = self.cause.as_ref();
        Some(cause)
    }
}

/// A unit of work panicked instead of returning.
///
/// The executor records this like any other work error so one panicking unit
/// fails the run instead of tearing down every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPanic {
    pub index: usize,
    pub message: String,
}

impl WorkerPanic {
    pub(crate) fn from_payload(index: usize, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self { index, message }
    }
}

impl fmt::Display for WorkerPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "work item {} panicked: {}", self.index, self.message)
    }
}

impl std::error::Error for WorkerPanic {}
