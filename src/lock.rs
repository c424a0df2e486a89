//! # FairLock
//!
//! A data-owning mutual exclusion lock on top of a [`BinarySemaphore`].
//!
//! Unlike a test-and-set spinlock, a [`FairLock`] is **fair**: threads enter
//! in the order they called [`lock`](FairLock::lock), so nobody starves
//! under contention. Waiting is still pure spinning with a bounded
//! [`BackOff`](crate::BackOff), so keep critical sections short and never
//! hold the lock across blocking calls.
//!
//! ## Example
//! ```rust
//! use axiom_ticket::{FairLock, System};
//!
//! static COUNTER: FairLock<u32, System> = FairLock::new(0);
//!
//! fn increment() {
//!     *COUNTER.lock() += 1;
//! }
//!
//! increment();
//! increment();
//! assert_eq!(*COUNTER.lock(), 2);
//! ```

use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::scope::{Scope, System};
use crate::sync::UnsafeCell;
use crate::BinarySemaphore;

/// A FIFO-fair lock protecting a `T`.
pub struct FairLock<T, S: Scope = System> {
    semaphore: BinarySemaphore<S>,
    data: UnsafeCell<T>,
}

/// Guard returned by [`FairLock::lock`]. Releases the lock when dropped.
#[must_use = "if unused the FairLock will immediately unlock"]
pub struct FairGuard<'a, T, S: Scope = System> {
    lock: &'a FairLock<T, S>,
}

impl<T, S: Scope> FairLock<T, S> {
    loom_const_fn! {
        /// Creates a new unlocked [`FairLock`] wrapping `data`.
        ///
        /// # Example
        /// ```
        /// use axiom_ticket::{FairLock, System};
        ///
        /// let lock = FairLock::<_, System>::new(123);
        /// assert_eq!(*lock.lock(), 123);
        /// ```
        #[inline(always)]
        pub fn new(data: T) -> Self {
            FairLock {
                semaphore: BinarySemaphore::new(),
                data: UnsafeCell::new(data),
            }
        }
    }

    /// Waits for this caller's turn and returns a guard.
    #[inline]
    pub fn lock(&self) -> FairGuard<'_, T, S> {
        self.semaphore.acquire();
        FairGuard { lock: self }
    }

    /// Locks only if nobody holds or awaits the lock.
    #[inline]
    pub fn try_lock(&self) -> Option<FairGuard<'_, T, S>> {
        self.semaphore
            .try_acquire()
            .then(|| FairGuard { lock: self })
    }

    /// Whether the lock is held or awaited.
    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.semaphore.is_locked()
    }

    /// Runs `f` with exclusive access to the data.
    ///
    /// # Example
    /// ```
    /// use axiom_ticket::{FairLock, System};
    ///
    /// let lock = FairLock::<_, System>::new(0i32);
    /// let doubled = lock.with_lock(|data| {
    ///     *data += 21;
    ///     *data * 2
    /// });
    /// assert_eq!(doubled, 42);
    /// ```
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Mutable access without locking; the borrow checker proves exclusivity.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        // SAFETY: `&mut self` means no guard is alive.
        self.data.with_mut(|ptr| unsafe { &mut *ptr })
    }

    /// Consumes the lock, returning the data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default, S: Scope> Default for FairLock<T, S> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, S: Scope> fmt::Debug for FairLock<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("FairLock");
        match self.try_lock() {
            Some(guard) => d.field("data", &&*guard),
            None => d.field("data", &format_args!("<locked>")),
        };
        d.finish()
    }
}

impl<T, S: Scope> Deref for FairGuard<'_, T, S> {
    type Target = T;
    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: the guard's existence proves this caller holds the semaphore.
        self.lock.data.with(|ptr| unsafe { &*ptr })
    }
}

impl<T, S: Scope> DerefMut for FairGuard<'_, T, S> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above; `&mut self` rules out aliasing through the guard.
        self.lock.data.with_mut(|ptr| unsafe { &mut *ptr })
    }
}

impl<T, S: Scope> Drop for FairGuard<'_, T, S> {
    #[inline]
    fn drop(&mut self) {
        self.lock.semaphore.release();
    }
}

impl<T: fmt::Debug, S: Scope> fmt::Debug for FairGuard<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

// Safety: FairLock enforces mutual exclusion through its semaphore.
unsafe impl<T: Send, S: Scope> Send for FairLock<T, S> {}
unsafe impl<T: Send, S: Scope> Sync for FairLock<T, S> {}

#[cfg(all(test, not(loom)))]
mod test {
    use std::sync::Arc;
    use std::thread;

    use crate::scope::{Block, System};
    use crate::FairLock;

    #[test]
    fn test_basic_lock_unlock() {
        let lock = FairLock::<_, System>::new(10);

        {
            let mut guard = lock.lock();
            *guard += 5;
            assert_eq!(*guard, 15);
        } // guard dropped here, automatically unlocks

        assert!(!lock.is_locked(), "Lock should be released after guard drop");
    }

    #[test]
    fn test_concurrent_access() {
        let lock = Arc::new(FairLock::<_, Block>::new(0usize));
        let mut handles = vec![];

        for _ in 0..8 {
            let lock_cloned = lock.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..2_000 {
                    let mut guard = lock_cloned.lock();
                    *guard += 1;
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        let final_value = *lock.lock();
        assert_eq!(final_value, 8 * 2_000, "Counter should match total increments");
    }

    #[test]
    fn test_try_lock_behavior() {
        let lock = FairLock::<_, System>::new(42);

        let guard = lock.lock();
        assert!(lock.try_lock().is_none(), "Lock should not be acquirable while held");

        drop(guard);
        let guard2 = lock.try_lock();
        assert!(guard2.is_some(), "Lock should succeed after previous guard drop");
    }

    #[test]
    fn owned_access() {
        let mut lock = FairLock::<_, System>::new(vec![1, 2]);
        lock.get_mut().push(3);
        lock.with_lock(|v| v.push(4));
        assert_eq!(lock.into_inner(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn debug_does_not_block_when_held() {
        let lock = FairLock::<_, System>::new(7);
        assert_eq!(format!("{lock:?}"), "FairLock { data: 7 }");

        let guard = lock.lock();
        assert_eq!(format!("{lock:?}"), "FairLock { data: <locked> }");
        assert_eq!(format!("{guard:?}"), "7");
    }
}
