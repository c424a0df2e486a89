//! # Scope
//!
//! Visibility scopes for the semaphore's counters.
//!
//! A scope names the set of agents guaranteed to observe an ordered memory
//! operation on the counters, from narrowest to broadest:
//!
//! | marker      | [`ThreadScope`]           | agents                                   |
//! |-------------|---------------------------|------------------------------------------|
//! | [`Block`]   | [`ThreadScope::Block`]    | one execution group sharing fast memory  |
//! | [`Device`]  | [`ThreadScope::Device`]   | the whole device / process               |
//! | [`System`]  | [`ThreadScope::System`]   | every cooperating agent in the system    |
//!
//! Scopes are type parameters, so picking one costs nothing at runtime. On a
//! conventional host all three collapse onto the same system-wide atomics;
//! the tag is carried for the benefit of callers and targets that offer
//! narrower visibility tiers.

use core::fmt;
use core::str::FromStr;

mod private {
    pub trait Sealed {}
}

/// Type-level visibility scope.
///
/// Sealed; implemented only by [`Block`], [`Device`] and [`System`].
pub trait Scope: private::Sealed + 'static {
    /// Runtime name of this scope.
    const KIND: ThreadScope;
}

/// Execution-group scope.
#[derive(Debug)]
pub enum Block {}

/// Device / process scope.
#[derive(Debug)]
pub enum Device {}

/// System scope. The default.
#[derive(Debug)]
pub enum System {}

impl private::Sealed for Block {}
impl private::Sealed for Device {}
impl private::Sealed for System {}

impl Scope for Block {
    const KIND: ThreadScope = ThreadScope::Block;
}

impl Scope for Device {
    const KIND: ThreadScope = ThreadScope::Device;
}

impl Scope for System {
    const KIND: ThreadScope = ThreadScope::System;
}

/// Runtime counterpart of [`Scope`], ordered narrowest to broadest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ThreadScope {
    /// See [`Block`].
    Block,
    /// See [`Device`].
    Device,
    /// See [`System`].
    #[default]
    System,
}

impl ThreadScope {
    /// Every scope, narrowest first.
    pub const ALL: [ThreadScope; 3] = [Self::Block, Self::Device, Self::System];

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Device => "device",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThreadScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a scope name is not one of `block`, `device` or `system`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown thread scope, expected one of `block`, `device`, `system`")]
pub struct ParseScopeError(());

impl FromStr for ThreadScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseScopeError(()))
    }
}
