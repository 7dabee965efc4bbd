use std::ops::{Deref, DerefMut};
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Advisory lock shared by the writer, the input listener and the render
/// path. Acquisition spins on `try_lock` with short sleeps, so there is no
/// fairness between waiters. The name of the current holder is kept for
/// tracing.
///
/// Not reentrant: acquiring twice from the same thread deadlocks.
pub struct ChartLock<T> {
    inner: Mutex<T>,
    holder: Mutex<Option<&'static str>>,
}

pub struct ChartGuard<'a, T> {
    guard: MutexGuard<'a, T>,
    holder: &'a Mutex<Option<&'static str>>,
}

impl<T> ChartLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            holder: Mutex::new(None),
        }
    }

    /// Blocks until the lock is free, then records `name` as the holder.
    pub fn acquire(&self, name: &'static str) -> ChartGuard<'_, T> {
        loop {
            if let Some(guard) = self.try_acquire(name) {
                return guard;
            }
            trace!(waiting = name, holder = ?self.holder(), "waiting for chart lock");
            thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn try_acquire(&self, name: &'static str) -> Option<ChartGuard<'_, T>> {
        let guard = self.inner.try_lock()?;
        *self.holder.lock() = Some(name);
        Some(ChartGuard {
            guard,
            holder: &self.holder,
        })
    }

    pub fn holder(&self) -> Option<&'static str> {
        *self.holder.lock()
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for ChartLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for ChartGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for ChartGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for ChartGuard<'_, T> {
    fn drop(&mut self) {
        *self.holder.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn holder_is_tracked_and_cleared() {
        let lock = ChartLock::new(0u32);
        {
            let mut guard = lock.acquire("writer");
            *guard += 1;
            assert_eq!(lock.holder(), Some("writer"));
            assert!(lock.try_acquire("reader").is_none());
        }
        assert_eq!(lock.holder(), None);
        assert!(!lock.is_locked());
        assert_eq!(lock.into_inner(), 1);
    }

    #[test]
    fn contended_increments_are_not_lost() {
        let lock = Arc::new(ChartLock::new(0u64));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        *lock.acquire("worker") += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.acquire("check"), 1000);
    }
}
