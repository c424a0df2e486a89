//! # FairSemaphore
//!
//! A ticket-ordered semaphore built from two atomic counters.
//!
//! Every [`acquire`](FairSemaphore::acquire) draws a ticket from `tickets`
//! with a single fetch-and-add, then polls `current` (the serving cursor)
//! until it shows that ticket. [`release`](FairSemaphore::release) advances
//! the cursor by one, handing the semaphore to the next ticket. The order in
//! which tickets are drawn is the order in which callers are served, no
//! matter how their poll loops interleave.
//!
//! Nothing here allocates, parks or calls into the OS; waiting is active
//! polling paced by a [`BackOff`].
//!
//! ## Memory ordering
//! - ticket dispensation is `Relaxed`: only uniqueness of the value matters.
//! - the cursor poll is `Acquire` and the cursor increment is `Release`, so
//!   everything a holder wrote before `release` is visible to the next holder
//!   once its `acquire` returns.
//!
//! ## Capacity
//! `CAPACITY` is stored in the type and reported by
//! [`capacity`](FairSemaphore::capacity), but it is **advisory**: the
//! semaphore admits one holder at a time whatever the value.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use axiom_ticket::BinarySemaphore;
//!
//! let sem = Arc::new(BinarySemaphore::<axiom_ticket::System>::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let sem = Arc::clone(&sem);
//!         thread::spawn(move || {
//!             let _permit = sem.permit();
//!             // critical section
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert!(!sem.is_locked());
//! ```
//!
//! ## Misuse
//! Calling `release` without a matching `acquire` skews the counters: every
//! caller whose ticket falls past the skew may enter early or wait forever.
//! It cannot corrupt memory, but it breaks exclusion. Prefer
//! [`permit`](FairSemaphore::permit) or [`FairLock`](crate::FairLock), which
//! release exactly once.

use core::fmt;
use core::marker::PhantomData;

use crossbeam_utils::CachePadded;

use crate::scope::{Scope, System};
use crate::sync::{
    AtomicU32,
    Ordering::{Acquire, Relaxed, Release},
};
use crate::BackOff;

/// Capacity reported when none is given (`i32::MAX`).
pub const DEFAULT_CAPACITY: usize = i32::MAX as usize;

/// A FIFO-fair ticket semaphore.
///
/// `S` is the visibility [`Scope`] of the counters and `CAPACITY` the
/// advisory capacity reported by [`capacity`](Self::capacity).
pub struct FairSemaphore<S: Scope = System, const CAPACITY: usize = DEFAULT_CAPACITY> {
    tickets: CachePadded<AtomicU32>,
    current: CachePadded<AtomicU32>,
    _scope: PhantomData<fn() -> S>,
}

/// A [`FairSemaphore`] with capacity 1, used as a mutual exclusion lock.
pub type BinarySemaphore<S = System> = FairSemaphore<S, 1>;

/// RAII permit returned by [`FairSemaphore::permit`]. Releases on drop.
#[must_use = "dropping a permit releases the semaphore immediately"]
pub struct Permit<'a, S: Scope = System, const CAPACITY: usize = DEFAULT_CAPACITY> {
    semaphore: &'a FairSemaphore<S, CAPACITY>,
}

impl<S: Scope, const CAPACITY: usize> FairSemaphore<S, CAPACITY> {
    /// The configured capacity, available at compile time.
    pub const MAX: usize = CAPACITY;

    loom_const_fn! {
        /// Creates a semaphore with both counters at zero.
        ///
        /// # Example
        /// ```
        /// use axiom_ticket::{FairSemaphore, Device};
        ///
        /// static SEM: FairSemaphore<Device, 4> = FairSemaphore::new();
        /// assert_eq!(SEM.capacity(), 4);
        /// ```
        #[inline(always)]
        pub fn new() -> Self {
            Self {
                tickets: CachePadded::new(AtomicU32::new(0)),
                current: CachePadded::new(AtomicU32::new(0)),
                _scope: PhantomData,
            }
        }
    }

    /// Takes a ticket and waits until it is served.
    ///
    /// Callers are served strictly in the order their tickets were drawn.
    /// Waits forever if an earlier holder never releases.
    #[inline]
    pub fn acquire(&self) {
        let ticket = self.take_ticket();
        self.wait_for(ticket);
    }

    /// Hands the semaphore to the next ticket holder.
    ///
    /// Must follow a successful [`acquire`](Self::acquire) or
    /// [`try_acquire`](Self::try_acquire) by the same logical holder.
    #[inline]
    pub fn release(&self) {
        self.current.fetch_add(1, Release);
    }

    /// Acquires only if no ticket is outstanding.
    ///
    /// Never waits and never jumps the queue: if anyone holds or awaits the
    /// semaphore this returns `false` without drawing a ticket.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        let serving = self.current.load(Acquire);
        self.tickets
            .compare_exchange(serving, serving.wrapping_add(1), Relaxed, Relaxed)
            .is_ok()
    }

    /// Acquires and returns a [`Permit`] that releases on drop.
    #[inline]
    pub fn permit(&self) -> Permit<'_, S, CAPACITY> {
        self.acquire();
        Permit { semaphore: self }
    }

    /// Non-blocking [`permit`](Self::permit).
    #[inline]
    pub fn try_permit(&self) -> Option<Permit<'_, S, CAPACITY>> {
        self.try_acquire().then(|| Permit { semaphore: self })
    }

    /// The advisory capacity. Does not reflect how many holders are admitted.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Whether a ticket is currently outstanding. A snapshot only.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.queue_depth() != 0
    }

    /// Number of outstanding tickets: the holder plus everyone waiting.
    ///
    /// A snapshot only; it may be stale as soon as it returns.
    #[inline]
    pub fn queue_depth(&self) -> u32 {
        // Cursor first: it never passes `tickets`, so the difference
        // cannot underflow.
        let serving = self.current.load(Acquire);
        let dispensed = self.tickets.load(Relaxed);
        dispensed.wrapping_sub(serving)
    }

    /// Draws the next ticket.
    #[inline(always)]
    pub(crate) fn take_ticket(&self) -> u32 {
        self.tickets.fetch_add(1, Relaxed)
    }

    /// Polls the cursor until `ticket` is served.
    ///
    /// Equality only, so counters may wrap freely.
    #[inline]
    pub(crate) fn wait_for(&self, ticket: u32) {
        let backoff = BackOff::new();
        while self.current.load(Acquire) != ticket {
            backoff.wait();
        }
    }

    #[cfg(all(test, not(loom)))]
    fn with_counters(tickets: u32, current: u32) -> Self {
        Self {
            tickets: CachePadded::new(AtomicU32::new(tickets)),
            current: CachePadded::new(AtomicU32::new(current)),
            _scope: PhantomData,
        }
    }
}

impl<S: Scope, const CAPACITY: usize> Default for FairSemaphore<S, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scope, const CAPACITY: usize> fmt::Debug for FairSemaphore<S, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairSemaphore")
            .field("scope", &S::KIND)
            .field("capacity", &CAPACITY)
            .field("tickets", &self.tickets.load(Relaxed))
            .field("current", &self.current.load(Relaxed))
            .finish()
    }
}

impl<S: Scope, const CAPACITY: usize> Drop for Permit<'_, S, CAPACITY> {
    #[inline]
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

impl<S: Scope, const CAPACITY: usize> fmt::Debug for Permit<'_, S, CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit")
            .field("semaphore", self.semaphore)
            .finish()
    }
}
