use std::sync::atomic::{AtomicBool, Ordering};

/// Lock-free cancellation signal shared by reference with the executor.
///
/// Every worker reads the flag before starting a unit of work, so raising it
/// stops further dispatch without interrupting units already running.
/// An absent flag (`None`) is treated as "never cancelled", see [`CancellationFlag::is_set`].
#[derive(Debug, Default)]
pub struct CancellationFlag {
    state: AtomicBool,
}

impl CancellationFlag {
    pub const fn new() -> Self {
        Self {
            state: AtomicBool::new(false),
        }
    }

    /// Overwrite the current value
    pub fn store(&self, value: bool) {
        self.state.store(value, Ordering::SeqCst);
    }

    pub fn load(&self) -> bool {
        self.state.load(Ordering::SeqCst)
    }

    /// Set the flag to `new` only if it currently equals `current`.
    ///
    /// Returns whether the swap happened.
    pub fn compare_and_swap(&self, current: bool, new: bool) -> bool {
        self.state
            .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Raise the flag. Shorthand for `store(true)`.
    pub fn cancel(&self) {
        self.store(true);
    }

    /// Null-safe load: `None` always reads as not cancelled.
    pub fn is_set(flag: Option<&Self>) -> bool {
        flag.is_some_and(Self::load)
    }
}
