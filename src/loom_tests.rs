//! Model-checked tests. Run with `RUSTFLAGS="--cfg loom" cargo test --lib --release`.
//!
//! The protected data lives in loom's `UnsafeCell` (directly, or through
//! `FairLock`), so loom reports a causal race if the semaphore's
//! acquire/release pairing ever stops ordering the critical sections.

use loom::cell::UnsafeCell;
use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;

use crate::{BinarySemaphore, Block, FairLock, System};

struct Guarded {
    semaphore: BinarySemaphore<Block>,
    data: UnsafeCell<usize>,
}

// Safety: `data` is only touched between acquire and release.
unsafe impl Sync for Guarded {}

#[test]
fn release_publishes_critical_section() {
    loom::model(|| {
        let shared = Arc::new(Guarded {
            semaphore: BinarySemaphore::new(),
            data: UnsafeCell::new(0),
        });

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    shared.semaphore.acquire();
                    shared.data.with_mut(|p| unsafe { *p += 1 });
                    shared.semaphore.release();
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        shared.semaphore.acquire();
        let value = shared.data.with(|p| unsafe { *p });
        shared.semaphore.release();
        assert_eq!(value, 2);
    });
}

#[test]
fn try_acquire_admits_one() {
    loom::model(|| {
        let sem = Arc::new(BinarySemaphore::<System>::new());
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let sem = Arc::clone(&sem);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    if sem.try_acquire() {
                        assert_eq!(inside.fetch_add(1, Ordering::Relaxed), 0);
                        inside.fetch_sub(1, Ordering::Relaxed);
                        sem.release();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert!(!sem.is_locked());
    });
}

#[test]
fn fair_lock_guards_data() {
    loom::model(|| {
        let lock = Arc::new(FairLock::<_, Block>::new(0usize));

        let other = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || *lock.lock() += 1)
        };
        *lock.lock() += 1;
        other.join().unwrap();

        assert_eq!(*lock.lock(), 2);
    });
}

#[test]
fn try_lock_sees_previous_holder() {
    loom::model(|| {
        let lock = Arc::new(FairLock::<_, System>::new(0usize));

        let writer = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || *lock.lock() += 1)
        };

        // A winner that follows the writer must read its write.
        if let Some(mut guard) = lock.try_lock() {
            assert!(*guard <= 1);
            *guard += 10;
        }

        writer.join().unwrap();
        let value = *lock.lock();
        assert!(value == 1 || value == 11, "unexpected value {value}");
    });
}
