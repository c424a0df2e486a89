//! Atomic counter capability.
//!
//! Every atomic and every shared cell the crate touches is imported from
//! here, so the whole crate can be swapped onto
//! [`loom`](https://docs.rs/loom)'s model-checked types with
//! `RUSTFLAGS="--cfg loom"`.

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicU32, Ordering};

#[cfg(loom)]
pub(crate) use loom::cell::UnsafeCell;

/// `core::cell::UnsafeCell` behind loom's closure-based API, so every access
/// to guarded data is visible to the model checker under `cfg(loom)`.
#[cfg(not(loom))]
#[repr(transparent)]
pub(crate) struct UnsafeCell<T>(core::cell::UnsafeCell<T>);

#[cfg(not(loom))]
impl<T> UnsafeCell<T> {
    #[inline(always)]
    pub(crate) const fn new(data: T) -> Self {
        Self(core::cell::UnsafeCell::new(data))
    }

    #[inline(always)]
    pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
        f(self.0.get())
    }

    #[inline(always)]
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
        f(self.0.get())
    }

    #[inline(always)]
    pub(crate) fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

/// Declares a `const fn` in normal builds and a plain `fn` under loom, whose
/// atomics cannot be constructed in const context.
macro_rules! loom_const_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident: $T:ty),*) -> $Ret:ty $body:block
    ) => {
        $(#[$meta])*
        #[cfg(not(loom))]
        $vis const fn $name($($arg: $T),*) -> $Ret $body

        $(#[$meta])*
        #[cfg(loom)]
        $vis fn $name($($arg: $T),*) -> $Ret $body
    };
}

/// Busy-wait hint. Under loom this hands control to the model scheduler.
#[cfg(not(loom))]
#[inline(always)]
pub(crate) fn spin_loop() {
    core::hint::spin_loop();
}

#[cfg(loom)]
#[inline(always)]
pub(crate) fn spin_loop() {
    loom::thread::yield_now();
}
