//! Common types used throughout the frontend.
//!
//! This module provides the building blocks shared by every frontend component:
//! 1. **Identifiers:** Instruction sequence numbers, stream ids, and thread ids.
//! 2. **Error Handling:** The frontend error type and result alias.

/// Error types for configuration and sequencing violations.
pub mod error;

/// Sequence number, stream id, and thread id types.
pub mod ids;

pub use error::{FrontendError, Result};
pub use ids::{InstSeqNum, StreamId, ThreadId};
