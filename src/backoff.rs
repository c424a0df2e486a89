//! # BackOff
//!
//! A bounded exponential backoff used between polls of a contended serving
//! cursor.
//!
//! The waiter starts at a single spin iteration and doubles after every failed
//! poll, saturating at [`MAX_SPIN`] (1024) iterations. Each iteration issues
//! [`core::hint::spin_loop`], a CPU pause hint the optimizer is not allowed to
//! remove, so the delay is real even though it touches no shared memory.
//!
//! A [`BackOff`] is meant to live for the duration of one acquisition: create
//! a fresh one per `acquire` call and the count naturally restarts at 1.
//!
//! ## Example
//! ```rust
//! use axiom_ticket::BackOff;
//!
//! let backoff = BackOff::new();
//!
//! loop {
//!     if try_acquire() {
//!         break;
//!     }
//!     backoff.wait();
//! }
//!
//! fn try_acquire() -> bool {
//!     // pseudo acquisition
//!     true
//! }
//! ```
//!
//! ## Feature flags
//! - **`std`**: once the spin count is saturated, every further wait also
//!   calls [`std::thread::yield_now`], so an oversubscribed host gives the
//!   next ticket holder a chance to run. Service order is unaffected.

use core::cell::Cell;

use crate::sync::spin_loop;

/// Maximum spin iterations per wait.
pub const MAX_SPIN: u32 = 1 << 10;

/// Starting spin count.
const START_VALUE: u32 = 1;

/// A bounded exponential backoff.
///
/// Each call to [`wait`](BackOff::wait) spins for the current count and then
/// doubles it, never exceeding [`MAX_SPIN`].
///
/// # Examples
///
/// ```rust
/// use axiom_ticket::backoff::{BackOff, MAX_SPIN};
///
/// let backoff = BackOff::new();
/// assert_eq!(backoff.current(), 1);
///
/// for _ in 0..20 {
///     backoff.wait();
/// }
/// assert_eq!(backoff.current(), MAX_SPIN);
/// ```
#[derive(Debug)]
pub struct BackOff {
    spin: Cell<u32>,
}

impl BackOff {
    /// Creates a new [`BackOff`] starting at one spin iteration.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            spin: Cell::new(START_VALUE),
        }
    }

    /// Spins for the current count, then doubles it up to [`MAX_SPIN`].
    #[inline(always)]
    pub fn wait(&self) {
        let end = self.spin.get();

        #[cfg(not(loom))]
        for _ in 0..end {
            spin_loop();
        }

        // One scheduler hand-off per poll keeps loom's state space small.
        #[cfg(loom)]
        spin_loop();

        self.spin.set((end << 1).min(MAX_SPIN));

        #[cfg(all(feature = "std", not(loom)))]
        if end >= MAX_SPIN {
            std::thread::yield_now();
        }
    }

    /// Returns the spin count the next [`wait`](BackOff::wait) will use.
    #[inline(always)]
    pub fn current(&self) -> u32 {
        self.spin.get()
    }

    /// Whether the spin count has reached [`MAX_SPIN`].
    #[inline(always)]
    pub fn is_saturated(&self) -> bool {
        self.spin.get() >= MAX_SPIN
    }

    /// Resets the spin count to one iteration.
    #[inline(always)]
    pub fn reset(&self) {
        self.spin.set(START_VALUE);
    }
}

impl Default for BackOff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_iteration() {
        let b = BackOff::new();
        assert_eq!(b.current(), 1);
        assert!(!b.is_saturated());
    }

    /// The count doubles per wait and saturates at MAX_SPIN.
    #[test]
    fn test_exponential_growth() {
        let b = BackOff::new();

        let mut expected = 1;
        for _ in 0..10 {
            assert_eq!(b.current(), expected);
            b.wait();
            expected <<= 1;
        }
        assert_eq!(b.current(), MAX_SPIN);
        assert!(b.is_saturated());
    }

    #[test]
    fn never_exceeds_max_spin() {
        let b = BackOff::new();
        for _ in 0..64 {
            b.wait();
            assert!(b.current() <= MAX_SPIN, "Backoff exceeded MAX_SPIN limit");
        }
    }

    #[test]
    fn test_reset_behavior() {
        let b = BackOff::new();

        for _ in 0..5 {
            b.wait();
        }
        assert_eq!(b.current(), 32);

        b.reset();
        assert_eq!(b.current(), START_VALUE, "Reset did not restore default spin");
    }
}
