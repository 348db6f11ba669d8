//! Frontend error definitions.
//!
//! Errors fall into two groups:
//! 1. **Configuration Violations:** Bad slot counts, inverted address ranges, or
//!    malformed configuration input, rejected at construction time.
//! 2. **Sequencing Violations:** Out-of-order or duplicate fetch/commit
//!    registration, unknown or reused stream ids. These indicate a bug in the
//!    pipeline model driving the frontend and must not be swallowed.
//!
//! Soft validity checks (`is_reasonable`, `slot_idx`) are not errors; they
//! return `bool` / `Option`.

use thiserror::Error;

use super::ids::{InstSeqNum, StreamId};

/// Convenience alias for results produced by the frontend.
pub type Result<T> = std::result::Result<T, FrontendError>;

/// Errors reported by the frontend bookkeeping structures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FrontendError {
    /// A fetch buffer entry was instantiated with zero slots.
    #[error("fetch buffer entry must have at least one branch slot")]
    InvalidSlotCount,

    /// More branches were supplied than the entry has slots.
    #[error("{count} branches do not fit in an entry with {capacity} slots")]
    TooManyBranches {
        /// Number of branches supplied.
        count: usize,
        /// Slot capacity of the entry.
        capacity: usize,
    },

    /// An address range whose end lies before its start.
    #[error("inverted fetch range [{start:#x}, {end:#x})")]
    InvertedRange {
        /// Start of the range.
        start: u64,
        /// End of the range (exclusive).
        end: u64,
    },

    /// A predicted fetch range wider than its entry can describe.
    #[error("fetch range [{start:#x}, {end:#x}) exceeds {limit} bytes")]
    RangeTooWide {
        /// Start of the range.
        start: u64,
        /// End of the range (exclusive).
        end: u64,
        /// Largest width allowed for the range.
        limit: u64,
    },

    /// A zero-byte fetch block size.
    #[error("fetch block size must be non-zero")]
    InvalidFetchBlock,

    /// Configuration input could not be parsed.
    #[error("invalid frontend configuration: {0}")]
    Config(String),

    /// The reserved unset sequence number was registered as an instruction.
    #[error("sequence number 0 is reserved and cannot name an instruction")]
    UnsetSequence,

    /// A fetch registration arrived with a lower sequence number than the last one.
    #[error("{stream}: fetch of {seq} after {last}")]
    FetchOutOfOrder {
        /// Stream the instruction was fetched under.
        stream: StreamId,
        /// Offending sequence number.
        seq: InstSeqNum,
        /// Last sequence number fetched under the stream.
        last: InstSeqNum,
    },

    /// A commit registration that does not strictly follow the previous one.
    #[error("{stream}: commit of {seq} does not follow {last}")]
    CommitOutOfOrder {
        /// Stream the instruction belongs to.
        stream: StreamId,
        /// Offending sequence number.
        seq: InstSeqNum,
        /// Last sequence number committed under the stream.
        last: InstSeqNum,
    },

    /// No live stream has the given id.
    #[error("unknown {0}")]
    UnknownStream(StreamId),

    /// A stream id was opened twice while still live.
    #[error("{0} is already open")]
    DuplicateStream(StreamId),
}

impl From<serde_json::Error> for FrontendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl FrontendError {
    /// Returns `true` for errors caused by the pipeline model violating
    /// fetch/commit ordering or stream ownership.
    pub const fn is_sequencing(&self) -> bool {
        matches!(
            self,
            Self::UnsetSequence
                | Self::FetchOutOfOrder { .. }
                | Self::CommitOutOfOrder { .. }
                | Self::UnknownStream(_)
                | Self::DuplicateStream(_)
        )
    }
}
