//! Frontend statistics collection.
//!
//! Tracks stream lifecycle counts and prediction accuracy:
//! 1. **Streams:** Opened, retired, and discarded.
//! 2. **Instructions:** Fetch and commit registrations.
//! 3. **Prediction:** Resolutions and mispredicted streams.

use std::fmt;

/// Counters maintained by the stream arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontendStats {
    /// Streams opened.
    pub streams_opened: u64,
    /// Finished streams retired.
    pub streams_retired: u64,
    /// Streams dropped before finishing (e.g. on a squash).
    pub streams_discarded: u64,
    /// Instructions registered as fetched.
    pub insts_fetched: u64,
    /// Instructions registered as committed.
    pub insts_committed: u64,
    /// Streams whose outcome was resolved at commit.
    pub streams_resolved: u64,
    /// Retired streams whose prediction was wrong.
    pub streams_mispredicted: u64,
}

impl FrontendStats {
    /// Fraction of retired streams that were predicted correctly.
    ///
    /// Returns `1.0` when nothing has retired yet.
    pub fn accuracy(&self) -> f64 {
        if self.streams_retired == 0 {
            return 1.0;
        }
        let correct = self.streams_retired.saturating_sub(self.streams_mispredicted);
        correct as f64 / self.streams_retired as f64
    }

    /// Number of streams currently in flight.
    pub const fn streams_live(&self) -> u64 {
        self.streams_opened
            .saturating_sub(self.streams_retired)
            .saturating_sub(self.streams_discarded)
    }
}

impl fmt::Display for FrontendStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FRONTEND")?;
        writeln!(f, "  streams.opened       {}", self.streams_opened)?;
        writeln!(f, "  streams.retired      {}", self.streams_retired)?;
        writeln!(f, "  streams.discarded    {}", self.streams_discarded)?;
        writeln!(f, "  streams.resolved     {}", self.streams_resolved)?;
        writeln!(f, "  streams.mispredicted {}", self.streams_mispredicted)?;
        writeln!(f, "  insts.fetched        {}", self.insts_fetched)?;
        writeln!(f, "  insts.committed      {}", self.insts_committed)?;
        write!(f, "  accuracy             {:.2}%", self.accuracy() * 100.0)
    }
}
