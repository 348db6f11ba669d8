//! Branch prediction unit (BRU) structures.
//!
//! This module contains the shapes the prediction mechanism fills in: branch
//! descriptions, branch slots, and the multi-slot Fetch Target Buffer entry.
//! How entries are looked up and trained is decided outside this crate.

pub use self::branch_info::{BranchInfo, BranchKind, BranchSlot};
pub use self::ftb::FtbEntry;

/// Branch descriptions and branch-buffer slots.
pub mod branch_info;

/// Fetch Target Buffer entry.
pub mod ftb;
