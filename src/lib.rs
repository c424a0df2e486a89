//! # axiom-ticket 🎟️
//!
//! A lightweight, **`no_std`-compatible**, **FIFO-fair** ticket semaphore for
//! latency-critical concurrent code.
//!
//! The crate includes:
//!
//! - [`FairSemaphore`] — a ticket-ordered semaphore built from two atomic counters.
//! - [`BinarySemaphore`] — the same semaphore with capacity 1, used as a lock.
//! - [`FairLock<T>`] — a data-owning lock with an RAII guard on top of it.
//! - [`BackOff`] — the bounded exponential busy-wait used between polls.
//!
//! Designed for places where blocking is **not an option** (kernels, compute
//! kernels, custom executors), nothing here parks a thread or calls into the
//! OS. Every caller draws a ticket with one atomic fetch-and-add and is served
//! strictly in ticket order.
//!
//! ## ✨ Features
//!
//! - ✅ `no_std` compatible (uses `core` only)
//! - ⚖️ Strict FIFO service order, O(1) space regardless of contention
//! - 🔭 Type-level visibility [`Scope`]s with zero runtime cost
//! - ⚙️ Optional `std` feature: yielding backoff, the [`stress`] harness and
//!   the `axiom-ticket` CLI
//!
//! ## 🚀 Quick Example
//!
//! ```rust
//! use axiom_ticket::{BinarySemaphore, FairLock, System};
//!
//! // Example 1: raw semaphore
//! let sem = BinarySemaphore::<System>::new();
//! sem.acquire();
//! // critical section
//! sem.release();
//!
//! // Example 2: FairLock
//! let lock = FairLock::<_, System>::new(0);
//! {
//!     let mut guard = lock.lock();
//!     *guard += 1;
//! } // released when the guard drops
//! assert_eq!(*lock.lock(), 1);
//! ```
//!
//! ## 🧠 Design
//!
//! `tickets` is bumped with `Relaxed` ordering (only uniqueness matters), the
//! serving cursor is polled with `Acquire` and advanced with `Release`, so a
//! holder's writes are visible to the next holder. Both counters are `u32`
//! compared for equality only, so they wrap around safely.
//!
//! The capacity parameter of [`FairSemaphore`] is **advisory**: it is
//! reported by [`FairSemaphore::capacity`] but the semaphore always admits a
//! single holder.
//!
//! ## ⚠️ Safety & Usage Notes
//!
//! - Balance every `acquire` with exactly one `release`; prefer
//!   [`FairSemaphore::permit`] or [`FairLock`].
//! - Keep critical sections short. A descheduled ticket holder stalls every
//!   ticket behind it.
//! - Dropping a semaphore while someone is waiting on it is a logic error.
//!
//! ## 🧪 Model checking
//!
//! The atomics can be swapped for [loom](https://docs.rs/loom)'s:
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --lib --release
//! ```

#![cfg_attr(not(any(feature = "std", test, loom)), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod sync;

pub mod backoff;
pub mod lock;
pub mod scope;
pub mod semaphore;

#[cfg(all(feature = "std", not(loom)))]
pub mod stress;

#[cfg(all(test, loom))]
mod loom_tests;

pub use backoff::BackOff;
pub use lock::{FairGuard, FairLock};
pub use scope::{Block, Device, ParseScopeError, Scope, System, ThreadScope};
pub use semaphore::{BinarySemaphore, FairSemaphore, Permit, DEFAULT_CAPACITY};
