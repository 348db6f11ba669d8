use ftbsim_core::common::{InstSeqNum, StreamId};
use ftbsim_core::core::pipeline::frontend::{FetchStream, StreamOutcome};
use ftbsim_core::core::units::bru::{BranchInfo, BranchKind, BranchSlot, FtbEntry};

/// A 4-byte conditional branch at `pc` jumping to `target`.
pub fn cond(pc: u64, target: u64) -> BranchInfo {
    BranchInfo::with_kind(pc, target, 4, BranchKind::Conditional)
}

/// A 4-byte direct jump at `pc` to `target`.
pub fn jump(pc: u64, target: u64) -> BranchInfo {
    BranchInfo::with_kind(pc, target, 4, BranchKind::Unconditional)
}

#[derive(Debug)]
pub struct EntryBuilder<const N: usize>(FtbEntry<N>);

impl<const N: usize> EntryBuilder<N> {
    /// A valid, empty entry.
    pub fn new() -> Self {
        let mut entry = FtbEntry::<N>::default();
        entry.valid = true;
        Self(entry)
    }

    pub fn tag(mut self, tag: u64) -> Self {
        self.0.tag = tag;
        self
    }

    pub fn tid(mut self, tid: u16) -> Self {
        self.0.tid = tid;
        self
    }

    pub fn fallthrough(mut self, pc: u64) -> Self {
        self.0.fallthrough_pc = pc;
        self
    }

    pub fn invalid(mut self) -> Self {
        self.0.valid = false;
        self
    }

    /// Places an occupied slot holding `info` at `idx`.
    pub fn slot(mut self, idx: usize, info: BranchInfo) -> Self {
        self.0.slots[idx] = BranchSlot::from(info);
        self
    }

    /// Places a slot holding `info` at `idx`, then marks it empty.
    pub fn empty_slot(mut self, idx: usize, info: BranchInfo) -> Self {
        self.0.slots[idx] = BranchSlot::from(info);
        self.0.slots[idx].invalidate();
        self
    }

    pub fn max_span(mut self, span: u64) -> Self {
        self.0 = self.0.with_max_span(span);
        self
    }

    pub fn build(self) -> FtbEntry<N> {
        self.0
    }
}

/// Opens a stream from `entry`, predicting `taken_slot` taken.
pub fn stream<const N: usize>(
    id: u64,
    start_pc: u64,
    entry: FtbEntry<N>,
    taken_slot: Option<usize>,
) -> FetchStream<N> {
    let prediction = StreamOutcome::from_entry(&entry, taken_slot);
    FetchStream::new(StreamId::new(id), start_pc, entry, prediction)
}

/// Registers fetches for every sequence number in `seqs`.
pub fn fetch_all<const N: usize>(stream: &mut FetchStream<N>, seqs: impl IntoIterator<Item = u64>) {
    for seq in seqs {
        stream
            .new_inst_fetched(InstSeqNum::new(seq))
            .expect("fetch registration");
    }
}
