//! Fetch target buffer and fetch stream bookkeeping for a decoupled frontend.
//!
//! This crate models how a speculative out-of-order core tracks predicted
//! control flow between prediction and commit:
//! 1. **BRU:** Branch descriptions, branch slots, and multi-slot FTB entries.
//! 2. **Streams:** In-flight fetch blocks with predicted and resolved outcomes
//!    and commit tracking.
//! 3. **Fetch targets:** Address ranges handed to the instruction fetch stage.
//! 4. **Arena:** Id-keyed ownership of streams from prediction to retirement.
//! 5. **Configuration and statistics.**

/// Common types (sequence numbers, stream ids, errors).
pub mod common;
/// Frontend configuration (block span, fetch block size).
pub mod config;
/// BRU structures and pipeline bookkeeping.
pub mod core;
/// Instruction interfaces consumed from the rest of the pipeline.
pub mod isa;
/// Frontend statistics.
pub mod stats;

pub use crate::common::{FrontendError, InstSeqNum, StreamId, ThreadId};
pub use crate::config::FrontendConfig;
pub use crate::core::pipeline::frontend::{
    FetchStream, FetchTargetEntry, Resolution, StreamArena, StreamOutcome, split_stream,
};
pub use crate::core::units::bru::{BranchInfo, BranchKind, BranchSlot, FtbEntry};
pub use crate::isa::{DynInst, PcTransition, StaticInst};
pub use crate::stats::FrontendStats;
