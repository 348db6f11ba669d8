//! Identifier types shared by the frontend.
//!
//! This module defines strong types for the identifiers that flow between
//! the prediction, fetch, and commit sides of the frontend:
//! 1. **Sequence Numbers:** Per-thread instruction ordering, with a reserved unset value.
//! 2. **Stream Ids:** Monotonically assigned identity of a fetch stream.
//! 3. **Thread Ids:** The simulated hardware thread owning an entry.

use std::fmt;

/// Identifier of a simulated hardware thread.
pub type ThreadId = u16;

/// An instruction sequence number.
///
/// Sequence numbers are generated outside the frontend and are strictly
/// increasing per simulated thread. The value zero is reserved to mean
/// "no instruction yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstSeqNum(pub u64);

impl InstSeqNum {
    /// The reserved "unset" sequence number.
    pub const UNSET: Self = Self(0);

    /// Creates a sequence number from a raw value.
    #[inline(always)]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the reserved unset value.
    #[inline(always)]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for InstSeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sn:{}", self.0)
    }
}

/// Identity of a fetch stream.
///
/// Assigned by the prediction mechanism in increasing order, so comparing two
/// ids orders the streams by age.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId(pub u64);

impl StreamId {
    /// Creates a stream id from a raw value.
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}
