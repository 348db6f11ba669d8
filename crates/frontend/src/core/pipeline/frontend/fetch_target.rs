//! Fetch target entries.
//!
//! A fetch target is the unit handed from the stream layer to the
//! instruction fetch stage: a contiguous address range `[start_pc, end_pc)`
//! belonging to one stream. Fetch targets are plain values; queueing and
//! delivering them is the fetch stage's job.

use tracing::error;

use crate::common::{FrontendError, Result, StreamId};

use super::stream::FetchStream;

/// An immutable fetch range derived from a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTargetEntry {
    stream_id: StreamId,
    start_pc: u64,
    end_pc: u64,
    has_branch: bool,
    target_pc: u64,
    is_stream_end: bool,
}

impl FetchTargetEntry {
    /// Creates a fetch target covering `[start_pc, end_pc)`.
    ///
    /// # Arguments
    ///
    /// * `stream_id` - The stream this range belongs to.
    /// * `start_pc` - First byte of the range.
    /// * `end_pc` - One past the last byte of the range.
    /// * `has_branch` - Whether the range ends in a taken branch.
    /// * `target_pc` - Target of that branch; meaningless when `has_branch` is false.
    /// * `is_stream_end` - Whether this is the last range of the stream.
    ///
    /// # Errors
    ///
    /// [`FrontendError::InvertedRange`] if `end_pc < start_pc`.
    pub const fn new(
        stream_id: StreamId,
        start_pc: u64,
        end_pc: u64,
        has_branch: bool,
        target_pc: u64,
        is_stream_end: bool,
    ) -> Result<Self> {
        if end_pc < start_pc {
            return Err(FrontendError::InvertedRange {
                start: start_pc,
                end: end_pc,
            });
        }
        Ok(Self {
            stream_id,
            start_pc,
            end_pc,
            has_branch,
            target_pc,
            is_stream_end,
        })
    }

    /// The stream this range belongs to.
    #[inline]
    pub const fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// First byte of the range.
    #[inline]
    pub const fn start_pc(&self) -> u64 {
        self.start_pc
    }

    /// One past the last byte of the range.
    #[inline]
    pub const fn end_pc(&self) -> u64 {
        self.end_pc
    }

    /// Number of bytes covered, `end_pc - start_pc`.
    #[inline]
    pub const fn size(&self) -> u64 {
        self.end_pc - self.start_pc
    }

    /// Whether the range ends in a taken branch.
    #[inline]
    pub const fn has_branch(&self) -> bool {
        self.has_branch
    }

    /// Branch target, if the range ends in a taken branch.
    pub const fn target(&self) -> Option<u64> {
        if self.has_branch {
            Some(self.target_pc)
        } else {
            None
        }
    }

    /// Raw branch target field.
    #[inline]
    pub const fn target_pc(&self) -> u64 {
        self.target_pc
    }

    /// Whether this is the last range of its stream.
    #[inline]
    pub const fn is_stream_end(&self) -> bool {
        self.is_stream_end
    }

    /// Whether `pc` falls inside this range.
    pub const fn contains(&self, pc: u64) -> bool {
        pc >= self.start_pc && pc < self.end_pc
    }
}

/// Splits the predicted range of `stream` into fetch targets.
///
/// The range `[stream.start_pc(), stream.end_pc())` is cut into consecutive
/// pieces of at most `fetch_block_bytes`. Only the last piece carries the
/// predicted taken branch and is marked as the stream end. An empty range
/// still yields one zero-sized stream-end target.
///
/// The range may be no wider than the predicted entry's block span, plus the
/// size of the predicted taken branch when there is one.
///
/// # Errors
///
/// * [`FrontendError::InvalidFetchBlock`] if `fetch_block_bytes` is zero.
/// * [`FrontendError::InvertedRange`] if the predicted end lies before the start.
/// * [`FrontendError::RangeTooWide`] if the range exceeds the block span.
pub fn split_stream<const N: usize>(
    stream: &FetchStream<N>,
    fetch_block_bytes: u64,
) -> Result<Vec<FetchTargetEntry>> {
    if fetch_block_bytes == 0 {
        return Err(FrontendError::InvalidFetchBlock);
    }

    let id = stream.stream_id();
    let start = stream.start_pc();
    let end = stream.end_pc();
    if end < start {
        return Err(FrontendError::InvertedRange { start, end });
    }

    let pred = stream.predicted();
    let branch_bytes = if pred.has_taken_branch {
        pred.branch.size() as u64
    } else {
        0
    };
    let limit = stream.pred_entry().max_span().saturating_add(branch_bytes);
    if end - start > limit {
        error!("{id}: predicted range [{start:#x}, {end:#x}) exceeds {limit} bytes");
        return Err(FrontendError::RangeTooWide { start, end, limit });
    }

    let mut targets = Vec::new();
    let mut pc = start;
    loop {
        let chunk_end = pc.saturating_add(fetch_block_bytes).min(end);
        let last = chunk_end == end;
        targets.push(FetchTargetEntry::new(
            id,
            pc,
            chunk_end,
            last && pred.has_taken_branch,
            if last { pred.target_pc } else { 0 },
            last,
        )?);
        if last {
            break;
        }
        pc = chunk_end;
    }
    Ok(targets)
}
