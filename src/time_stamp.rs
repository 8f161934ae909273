//! Monotonic modification clock.
//!
//! Every object that participates in staleness checks carries a [`TimeStamp`].
//! Marking an object as modified draws a fresh tick from a process-wide
//! counter, so comparing two stamps tells which change happened last without
//! recomputing anything.

use std::sync::atomic::{AtomicU64, Ordering};

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// A point on the modification clock.
///
/// The default stamp is [`TimeStamp::NEVER`], which orders before every
/// stamp produced by [`TimeStamp::now`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeStamp(u64);

impl TimeStamp {
    /// A stamp that was never modified.
    pub const NEVER: Self = Self(0);

    /// Draw a fresh tick, strictly later than every tick drawn before.
    pub fn now() -> Self {
        Self(CLOCK.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Move this stamp to the current tick.
    #[inline]
    pub fn modified(&mut self) {
        *self = Self::now();
    }

    /// Raw tick value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns `true` if this stamp was never modified.
    #[inline]
    pub fn is_never(&self) -> bool {
        self.0 == 0
    }

    /// Returns the later of the given stamps.
    pub fn latest<I: IntoIterator<Item = TimeStamp>>(stamps: I) -> Self {
        stamps.into_iter().max().unwrap_or(Self::NEVER)
    }
}
