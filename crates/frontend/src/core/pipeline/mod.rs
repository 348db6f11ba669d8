//! Instruction pipeline pieces owned by this crate.
//!
//! Only the decoupled frontend lives here: fetch streams, the fetch target
//! hand-off, and the arena that owns streams between prediction and commit.

/// Fetch streams, fetch targets, and the stream arena.
pub mod frontend;
