//! Core frontend implementation.
//!
//! This module contains the branch prediction unit's data structures and the
//! pipeline-side bookkeeping built on them.

/// Pipeline bookkeeping (fetch streams, fetch targets, stream arena).
pub mod pipeline;

/// Prediction-side units (branch slots, FTB entries).
pub mod units;
