//! # Stress harness
//!
//! Hammers a [`BinarySemaphore`] from many threads and checks the three
//! properties a ticket lock promises:
//!
//! - **exclusion**: never more than one thread inside the critical section;
//! - **no lost updates**: a counter bumped with a split load/store under the
//!   lock ends at exactly `threads * iterations`;
//! - **FIFO**: the *k*-th entry into the critical section holds ticket *k*.
//!
//! Only available with the `std` feature. The `axiom-ticket` binary is a thin
//! CLI over [`run`].

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::scope::{Block, Device, Scope, System, ThreadScope};
use crate::BinarySemaphore;

/// Errors reported by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum StressError {
    /// The configuration cannot run.
    #[error("invalid stress configuration: {0}")]
    InvalidConfig(&'static str),

    /// The counter missed increments.
    #[error("lost updates: expected {expected} increments, observed {observed}")]
    LostUpdates {
        /// `threads * iterations`.
        expected: u64,
        /// Final counter value.
        observed: u64,
    },

    /// More than one holder was inside at once.
    #[error("mutual exclusion violated: {max_holders} holders inside at once")]
    ExclusionViolated {
        /// Highest concurrent holder count seen.
        max_holders: usize,
    },

    /// A ticket was served out of order.
    #[error("FIFO violated: ticket {ticket} entered as entry number {entry}")]
    FifoViolated {
        /// Ticket of the offending holder.
        ticket: u32,
        /// Position at which it actually entered.
        entry: u32,
    },

    /// A worker thread panicked.
    #[error("a stress worker panicked")]
    WorkerPanicked,
}

/// What to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    /// Concurrent workers.
    pub threads: usize,
    /// Critical sections entered per worker.
    pub iterations: usize,
    /// Scope the semaphore is instantiated with.
    pub scope: ThreadScope,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            iterations: 10_000,
            scope: ThreadScope::System,
        }
    }
}

impl StressConfig {
    fn validate(&self) -> Result<(), StressError> {
        if self.threads == 0 {
            return Err(StressError::InvalidConfig("threads must be at least 1"));
        }
        if self.iterations == 0 {
            return Err(StressError::InvalidConfig("iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressReport {
    /// Scope the semaphore ran with.
    pub scope: ThreadScope,
    /// Workers spawned.
    pub threads: usize,
    /// Critical sections per worker.
    pub iterations: usize,
    /// Final counter value.
    pub increments: u64,
    /// Highest concurrent holder count seen; 1 on success.
    pub max_holders: usize,
    /// Wall time for all workers.
    pub elapsed: Duration,
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_sec = self.increments as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON);
        writeln!(f, "scope:        {}", self.scope)?;
        writeln!(f, "threads:      {}", self.threads)?;
        writeln!(f, "iterations:   {}", self.iterations)?;
        writeln!(f, "increments:   {}", self.increments)?;
        writeln!(f, "max holders:  {}", self.max_holders)?;
        writeln!(f, "fifo:         ok")?;
        write!(f, "elapsed:      {:.3?} ({per_sec:.0} acquisitions/s)", self.elapsed)
    }
}

/// Runs the harness described by `config`.
pub fn run(config: &StressConfig) -> Result<StressReport, StressError> {
    config.validate()?;
    info!(
        "stressing {} semaphore: {} threads x {} iterations",
        config.scope, config.threads, config.iterations
    );

    match config.scope {
        ThreadScope::Block => run_scoped::<Block>(config),
        ThreadScope::Device => run_scoped::<Device>(config),
        ThreadScope::System => run_scoped::<System>(config),
    }
}

struct Shared<S: Scope> {
    semaphore: BinarySemaphore<S>,
    counter: AtomicU64,
    entries: AtomicU32,
    inside: AtomicUsize,
    max_inside: AtomicUsize,
    fifo_broken: AtomicBool,
    first_fifo_violation: AtomicU64,
}

impl<S: Scope> Shared<S> {
    fn critical_section(&self) {
        let ticket = self.semaphore.take_ticket();
        self.semaphore.wait_for(ticket);

        let holders = self.inside.fetch_add(1, Ordering::Relaxed) + 1;
        self.max_inside.fetch_max(holders, Ordering::Relaxed);

        // Entries are only counted under the lock, so they line up with
        // tickets exactly when service is FIFO.
        let entry = self.entries.load(Ordering::Relaxed);
        self.entries.store(entry.wrapping_add(1), Ordering::Relaxed);
        if entry != ticket && !self.fifo_broken.swap(true, Ordering::Relaxed) {
            let packed = (u64::from(ticket) << 32) | u64::from(entry);
            self.first_fifo_violation.store(packed, Ordering::Relaxed);
        }

        // Split read-modify-write: only exclusion keeps it exact.
        let value = self.counter.load(Ordering::Relaxed);
        self.counter.store(value + 1, Ordering::Relaxed);

        self.inside.fetch_sub(1, Ordering::Relaxed);
        self.semaphore.release();
    }
}

fn run_scoped<S: Scope>(config: &StressConfig) -> Result<StressReport, StressError> {
    let shared = Arc::new(Shared::<S> {
        semaphore: BinarySemaphore::new(),
        counter: AtomicU64::new(0),
        entries: AtomicU32::new(0),
        inside: AtomicUsize::new(0),
        max_inside: AtomicUsize::new(0),
        fifo_broken: AtomicBool::new(false),
        first_fifo_violation: AtomicU64::new(0),
    });

    let started = Instant::now();
    let workers: Vec<_> = (0..config.threads)
        .map(|id| {
            let shared = Arc::clone(&shared);
            let iterations = config.iterations;
            thread::spawn(move || {
                for _ in 0..iterations {
                    shared.critical_section();
                }
                debug!("worker {id} finished {iterations} iterations");
            })
        })
        .collect();

    let mut panicked = false;
    for worker in workers {
        if worker.join().is_err() {
            warn!("stress worker panicked");
            panicked = true;
        }
    }
    let elapsed = started.elapsed();

    if panicked {
        return Err(StressError::WorkerPanicked);
    }

    let expected = (config.threads as u64) * (config.iterations as u64);
    let observed = shared.counter.load(Ordering::Relaxed);
    let max_holders = shared.max_inside.load(Ordering::Relaxed);

    if max_holders > 1 {
        return Err(StressError::ExclusionViolated { max_holders });
    }
    if shared.fifo_broken.load(Ordering::Relaxed) {
        let packed = shared.first_fifo_violation.load(Ordering::Relaxed);
        return Err(StressError::FifoViolated {
            ticket: (packed >> 32) as u32,
            entry: packed as u32,
        });
    }
    if observed != expected {
        return Err(StressError::LostUpdates { expected, observed });
    }

    info!("stress run passed in {elapsed:.3?}");
    Ok(StressReport {
        scope: S::KIND,
        threads: config.threads,
        iterations: config.iterations,
        increments: observed,
        max_holders,
        elapsed,
    })
}
