use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread safe vector that keeps critical sections short and hands out
/// snapshots instead of references.
///
/// Every operation takes the lock exactly once, so each call is atomic on its
/// own. Sequences of calls are not: [`len`](Self::len) is only a hint, another
/// thread may push or pop right after it returns.
///
/// Indexed `get`/`set` are intentionally missing. An index read in one call can
/// be stale or out of range by the next, so only whole-vector and end-of-vector
/// operations are exposed.
#[derive(Debug)]
pub struct ConcurrentVec<T> {
    buf: RwLock<Vec<T>>,
}

impl<T> ConcurrentVec<T> {
    pub fn new() -> Self {
        Self {
            buf: RwLock::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    /// Current number of elements. Advisory only under concurrent use.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove and return everything currently stored.
    ///
    /// Elements pushed after the drain stay in the vector for the next one.
    pub fn drain(&self) -> Vec<T> {
        let mut buf = self.write();
        let capacity = buf.len();
        std::mem::replace(&mut *buf, Vec::with_capacity(capacity))
    }

    pub fn push_back(&self, elem: T) {
        self.write().push(elem);
    }

    /// Remove the last element, or `None` if the vector is empty.
    pub fn pop_back(&self) -> Option<T> {
        self.write().pop()
    }

    /// Remove the first element, or `None` if the vector is empty.
    ///
    /// This shifts every remaining element down by one, so it is linear in the
    /// length. Fine for short lists such as collected errors.
    pub fn pop_first(&self) -> Option<T> {
        let mut buf = self.write();
        if buf.is_empty() {
            return None;
        }
        Some(buf.remove(0))
    }

    pub fn into_inner(self) -> Vec<T> {
        self.buf.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // A panic can't leave the Vec half-modified inside any of our critical
    // sections, so a poisoned lock still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.buf.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.buf.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ConcurrentVec<T> {
    /// Snapshot of the current elements
    pub fn copy(&self) -> Vec<T> {
        self.read().clone()
    }
}

impl<T> Default for ConcurrentVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ConcurrentVec<T> {
    fn from(buf: Vec<T>) -> Self {
        Self {
            buf: RwLock::new(buf),
        }
    }
}

impl<T> FromIterator<T> for ConcurrentVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
