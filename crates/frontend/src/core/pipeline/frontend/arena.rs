//! Stream arena.
//!
//! The arena owns every in-flight fetch stream, keyed by stream id. Other
//! components (fetch targets, the fetch stage, commit) refer to streams by id
//! only, so retiring or dropping a stream is an explicit arena operation:
//! 1. **Open:** A prediction creates a stream under a fresh id.
//! 2. **Registration:** Fetch and commit events are routed to the stream by id.
//! 3. **Retirement:** Finished streams are removed oldest first.
//! 4. **Discard:** The owner may drop a stream that will never finish.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, error};

use super::stream::{FetchStream, StreamOutcome};
use crate::common::{FrontendError, InstSeqNum, Result, StreamId};
use crate::core::units::bru::FtbEntry;
use crate::isa::DynInst;
use crate::stats::FrontendStats;

/// Owner of all in-flight fetch streams with `N`-slot FTB entries.
#[derive(Clone, Debug, Default)]
pub struct StreamArena<const N: usize> {
    streams: BTreeMap<StreamId, FetchStream<N>>,
    stats: FrontendStats,
}

impl<const N: usize> StreamArena<N> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            streams: BTreeMap::new(),
            stats: FrontendStats::default(),
        }
    }

    /// Opens a new stream.
    ///
    /// # Errors
    ///
    /// [`FrontendError::DuplicateStream`] if a live stream already uses `stream_id`.
    pub fn open(
        &mut self,
        stream_id: StreamId,
        start_pc: u64,
        entry: FtbEntry<N>,
        prediction: StreamOutcome,
    ) -> Result<()> {
        match self.streams.entry(stream_id) {
            Entry::Occupied(_) => {
                error!("{stream_id} opened twice");
                Err(FrontendError::DuplicateStream(stream_id))
            }
            Entry::Vacant(slot) => {
                let _ = slot.insert(FetchStream::new(stream_id, start_pc, entry, prediction));
                self.stats.streams_opened += 1;
                Ok(())
            }
        }
    }

    /// Returns the stream with the given id.
    pub fn get(&self, stream_id: StreamId) -> Option<&FetchStream<N>> {
        self.streams.get(&stream_id)
    }

    /// Returns the stream with the given id mutably.
    pub fn get_mut(&mut self, stream_id: StreamId) -> Option<&mut FetchStream<N>> {
        self.streams.get_mut(&stream_id)
    }

    /// Whether a live stream has the given id.
    pub fn contains(&self, stream_id: StreamId) -> bool {
        self.streams.contains_key(&stream_id)
    }

    /// Number of live streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether no stream is live.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Iterates over live streams, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FetchStream<N>> {
        self.streams.values()
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &FrontendStats {
        &self.stats
    }

    fn stream_mut(&mut self, stream_id: StreamId) -> Result<&mut FetchStream<N>> {
        self.streams.get_mut(&stream_id).ok_or_else(|| {
            error!("event for unknown {stream_id}");
            FrontendError::UnknownStream(stream_id)
        })
    }

    /// Routes a fetch registration to its stream.
    ///
    /// # Errors
    ///
    /// [`FrontendError::UnknownStream`] for a missing id, otherwise whatever
    /// [`FetchStream::new_inst_fetched`] reports.
    pub fn new_inst_fetched(&mut self, stream_id: StreamId, seq: InstSeqNum) -> Result<()> {
        self.stream_mut(stream_id)?.new_inst_fetched(seq)?;
        self.stats.insts_fetched += 1;
        Ok(())
    }

    /// Routes a commit registration to its stream.
    ///
    /// # Errors
    ///
    /// [`FrontendError::UnknownStream`] for a missing id, otherwise whatever
    /// [`FetchStream::new_inst_committed`] reports.
    pub fn new_inst_committed<I: DynInst + ?Sized>(
        &mut self,
        stream_id: StreamId,
        inst: &I,
        seq: InstSeqNum,
    ) -> Result<()> {
        let stream = self.stream_mut(stream_id)?;
        let was_resolved = stream.resolved();
        stream.new_inst_committed(inst, seq)?;
        let now_resolved = stream.resolved();

        self.stats.insts_committed += 1;
        if now_resolved && !was_resolved {
            self.stats.streams_resolved += 1;
        }
        Ok(())
    }

    /// Removes every finished stream and returns their ids, oldest first.
    pub fn retire_finished(&mut self) -> Vec<StreamId> {
        let done: Vec<StreamId> = self
            .streams
            .values()
            .filter(|s| s.finished())
            .map(FetchStream::stream_id)
            .collect();

        for id in &done {
            if let Some(stream) = self.streams.remove(id) {
                self.stats.streams_retired += 1;
                if stream.mispredicted() {
                    self.stats.streams_mispredicted += 1;
                }
                debug!(
                    "{id}: retired [{}, {}] mispredicted={}",
                    stream.first_inst_seq(),
                    stream.last_inst_seq(),
                    stream.mispredicted()
                );
            }
        }
        done
    }

    /// Drops a stream that will never finish, returning it if it was live.
    pub fn discard(&mut self, stream_id: StreamId) -> Option<FetchStream<N>> {
        let stream = self.streams.remove(&stream_id)?;
        self.stats.streams_discarded += 1;
        debug!("{stream_id}: discarded");
        Some(stream)
    }

    /// Drops every stream younger than `stream_id`, returning how many were dropped.
    ///
    /// Used when a misprediction in `stream_id` squashes the wrong path.
    pub fn discard_younger(&mut self, stream_id: StreamId) -> usize {
        let Some(next) = stream_id.val().checked_add(1) else {
            return 0;
        };
        let younger = self.streams.split_off(&StreamId::new(next));
        self.stats.streams_discarded += younger.len() as u64;
        if !younger.is_empty() {
            debug!("squashed {} streams younger than {stream_id}", younger.len());
        }
        younger.len()
    }
}
