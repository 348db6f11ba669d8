//! Fetch streams.
//!
//! A fetch stream follows one predicted fetch block from the moment the
//! prediction is made until its last fetched instruction commits. It keeps:
//! 1. **Prediction:** The FTB entry and outcome the predictor produced. Never modified.
//! 2. **Resolution:** The outcome observed at commit, once a control-flow
//!    instruction of the stream changes the program flow.
//! 3. **Accounting:** The sequence-number span of fetched instructions and the
//!    last committed one, used to tell when the stream is finished.
//!
//! Outcome accessors read the resolved outcome once there is one and the
//! predicted outcome before that. Both live in a single [`Resolution`] value,
//! so a reader can never see a mix of the two.

use tracing::{debug, error, trace};

use crate::common::{FrontendError, InstSeqNum, Result, StreamId};
use crate::core::units::bru::{BranchInfo, FtbEntry};
use crate::isa::DynInst;

/// The control-flow outcome of a stream, either predicted or resolved.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamOutcome {
    /// The controlling branch (the taken one, if any).
    pub branch: BranchInfo,
    /// Whether the block contains a branch.
    pub has_branch: bool,
    /// Whether a branch in the block is taken.
    pub has_taken_branch: bool,
    /// Address of the taken branch.
    pub taken_branch_pc: u64,
    /// Target of the taken branch.
    pub target_pc: u64,
    /// Address reached when no branch is taken.
    pub fallthrough_pc: u64,
}

impl StreamOutcome {
    /// Combines an FTB entry with the predictor's choice of taken slot.
    ///
    /// `taken_slot` names the slot predicted taken; `None`, an out-of-range
    /// index, or an empty slot all give a not-taken outcome that falls
    /// through to the entry's fallthrough address.
    pub fn from_entry<const N: usize>(entry: &FtbEntry<N>, taken_slot: Option<usize>) -> Self {
        let mut outcome = Self {
            has_branch: entry.valid_slot_num() > 0,
            fallthrough_pc: entry.fallthrough_pc,
            ..Self::default()
        };

        if let Some(slot) = taken_slot
            .and_then(|idx| entry.slot(idx))
            .filter(|s| s.is_valid())
        {
            outcome.branch = *slot.info();
            outcome.has_taken_branch = true;
            outcome.taken_branch_pc = slot.pc();
            outcome.target_pc = slot.target();
        }
        outcome
    }

    /// A taken-branch outcome for `branch`, keeping `fallthrough_pc`.
    pub const fn taken(branch: BranchInfo, fallthrough_pc: u64) -> Self {
        Self {
            branch,
            has_branch: true,
            has_taken_branch: true,
            taken_branch_pc: branch.pc(),
            target_pc: branch.target(),
            fallthrough_pc,
        }
    }

    /// A not-taken outcome falling through to `fallthrough_pc`.
    pub fn not_taken(has_branch: bool, fallthrough_pc: u64) -> Self {
        Self {
            has_branch,
            fallthrough_pc,
            ..Self::default()
        }
    }
}

impl PartialEq for StreamOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.branch.same_fields(&other.branch)
            && self.has_branch == other.has_branch
            && self.has_taken_branch == other.has_taken_branch
            && self.taken_branch_pc == other.taken_branch_pc
            && self.target_pc == other.target_pc
            && self.fallthrough_pc == other.fallthrough_pc
    }
}

impl Eq for StreamOutcome {}

/// Which outcome of a stream is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Only the prediction is known.
    Predicted(StreamOutcome),
    /// The real outcome has been observed at commit.
    Resolved {
        /// The original prediction, kept for accuracy accounting.
        predicted: StreamOutcome,
        /// The outcome observed at commit.
        exec: StreamOutcome,
    },
}

impl Resolution {
    /// The outcome readers should act on.
    pub const fn authoritative(&self) -> &StreamOutcome {
        match self {
            Self::Predicted(pred) => pred,
            Self::Resolved { exec, .. } => exec,
        }
    }

    /// The predicted outcome.
    pub const fn predicted(&self) -> &StreamOutcome {
        match self {
            Self::Predicted(pred) | Self::Resolved { predicted: pred, .. } => pred,
        }
    }

    /// The resolved outcome, if any.
    pub const fn exec(&self) -> Option<&StreamOutcome> {
        match self {
            Self::Predicted(_) => None,
            Self::Resolved { exec, .. } => Some(exec),
        }
    }

    /// Whether the real outcome is known.
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// An in-flight fetch stream built around an FTB entry with `N` slots.
#[derive(Clone, Debug)]
pub struct FetchStream<const N: usize> {
    stream_id: StreamId,
    start_pc: u64,
    pred_entry: FtbEntry<N>,
    updated_entry: FtbEntry<N>,
    resolution: Resolution,
    first_inst_seq: InstSeqNum,
    last_inst_seq: InstSeqNum,
    last_committed_inst_seq: InstSeqNum,
}

impl<const N: usize> FetchStream<N> {
    /// Opens a stream for the fetch block starting at `start_pc`.
    ///
    /// # Arguments
    ///
    /// * `stream_id` - Id assigned by the prediction mechanism.
    /// * `start_pc` - Fetch-start address of the block.
    /// * `pred_entry` - The FTB entry the prediction was made from.
    /// * `prediction` - The predicted outcome (see [`StreamOutcome::from_entry`]).
    pub fn new(
        stream_id: StreamId,
        start_pc: u64,
        pred_entry: FtbEntry<N>,
        prediction: StreamOutcome,
    ) -> Self {
        trace!(
            "{stream_id}: open at {start_pc:#x}, predicted taken={} target={:#x}",
            prediction.has_taken_branch,
            prediction.target_pc
        );
        Self {
            stream_id,
            start_pc,
            updated_entry: pred_entry.clone(),
            pred_entry,
            resolution: Resolution::Predicted(prediction),
            first_inst_seq: InstSeqNum::UNSET,
            last_inst_seq: InstSeqNum::UNSET,
            last_committed_inst_seq: InstSeqNum::UNSET,
        }
    }

    /// Registers that instruction `seq` was fetched under this stream.
    ///
    /// Fetch registrations must arrive in non-decreasing sequence order.
    ///
    /// # Errors
    ///
    /// * [`FrontendError::UnsetSequence`] if `seq` is the reserved zero value.
    /// * [`FrontendError::FetchOutOfOrder`] if `seq` is older than the last fetch.
    pub fn new_inst_fetched(&mut self, seq: InstSeqNum) -> Result<()> {
        if seq.is_unset() {
            error!("{}: fetch registered with unset sequence number", self.stream_id);
            return Err(FrontendError::UnsetSequence);
        }
        if seq < self.last_inst_seq {
            error!(
                "{}: fetch of {seq} arrived after {}",
                self.stream_id, self.last_inst_seq
            );
            return Err(FrontendError::FetchOutOfOrder {
                stream: self.stream_id,
                seq,
                last: self.last_inst_seq,
            });
        }

        if self.first_inst_seq.is_unset() {
            self.first_inst_seq = seq;
        }
        self.last_inst_seq = seq;
        Ok(())
    }

    /// Registers that instruction `seq` of this stream committed.
    ///
    /// Commit registrations must be strictly increasing. A committed
    /// conditional branch that was taken, or any committed unconditional
    /// control instruction, resolves the stream if it is not resolved yet.
    /// So does a not-taken commit of the branch predicted taken, with a
    /// fall-through outcome. Taken control instructions also train the
    /// updated entry.
    ///
    /// # Errors
    ///
    /// * [`FrontendError::UnsetSequence`] if `seq` is the reserved zero value.
    /// * [`FrontendError::CommitOutOfOrder`] if `seq` does not follow the last commit.
    pub fn new_inst_committed<I: DynInst + ?Sized>(
        &mut self,
        inst: &I,
        seq: InstSeqNum,
    ) -> Result<()> {
        if seq.is_unset() {
            error!("{}: commit registered with unset sequence number", self.stream_id);
            return Err(FrontendError::UnsetSequence);
        }
        if !self.last_committed_inst_seq.is_unset() && seq <= self.last_committed_inst_seq {
            error!(
                "{}: commit of {seq} does not follow {}",
                self.stream_id, self.last_committed_inst_seq
            );
            return Err(FrontendError::CommitOutOfOrder {
                stream: self.stream_id,
                seq,
                last: self.last_committed_inst_seq,
            });
        }
        self.last_committed_inst_seq = seq;

        if inst.is_cond_ctrl() {
            self.cond_ctrl_committed(inst);
        } else if inst.is_uncond_ctrl() {
            self.uncond_ctrl_committed(inst);
        }
        Ok(())
    }

    /// Conditional-commit resolution: taken branches resolve the stream,
    /// not-taken ones lose their always-taken bias. A not-taken commit of the
    /// branch predicted taken resolves the stream as falling through.
    fn cond_ctrl_committed<I: DynInst + ?Sized>(&mut self, inst: &I) {
        let pcs = inst.pc_state();
        if pcs.branching() {
            let branch = BranchInfo::new(pcs.pc, pcs.npc, inst, pcs.size);
            self.train(branch);
            self.resolve(|pred| StreamOutcome::taken(branch, pred.fallthrough_pc));
            return;
        }

        if let Some(idx) = self.updated_entry.slot_idx(pcs.pc) {
            self.updated_entry.slots[idx].unset_always_taken();
            trace!("{}: branch at {:#x} seen not taken", self.stream_id, pcs.pc);
        }
        let pred = self.predicted();
        if pred.has_taken_branch && pred.taken_branch_pc == pcs.pc {
            self.resolve(|pred| StreamOutcome::not_taken(pred.has_branch, pred.fallthrough_pc));
        }
    }

    /// Unconditional-commit resolution: the branch is always taken.
    fn uncond_ctrl_committed<I: DynInst + ?Sized>(&mut self, inst: &I) {
        let pcs = inst.pc_state();
        let branch = BranchInfo::new(pcs.pc, pcs.npc, inst, pcs.size);
        self.train(branch);
        self.resolve(|pred| StreamOutcome::taken(branch, pred.fallthrough_pc));
    }

    /// Records a committed branch in the updated entry.
    fn train(&mut self, branch: BranchInfo) {
        if !self.updated_entry.insert_branch(branch) {
            debug!(
                "{}: no free slot for branch at {:#x}, training dropped",
                self.stream_id,
                branch.pc()
            );
        }
    }

    /// Resolves the stream with the outcome built from the prediction.
    /// Does nothing if the stream is already resolved.
    fn resolve(&mut self, observed: impl FnOnce(&StreamOutcome) -> StreamOutcome) {
        if let Resolution::Predicted(predicted) = self.resolution {
            let exec = observed(&predicted);
            self.resolution = Resolution::Resolved { predicted, exec };
            debug!(
                "{}: resolved taken={} at {:#x} -> {:#x}",
                self.stream_id,
                exec.has_taken_branch,
                exec.taken_branch_pc,
                exec.target_pc
            );
        }
    }

    /// Id of this stream.
    pub const fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Fetch-start address of this stream.
    pub const fn start_pc(&self) -> u64 {
        self.start_pc
    }

    /// The FTB entry the prediction was made from.
    pub const fn pred_entry(&self) -> &FtbEntry<N> {
        &self.pred_entry
    }

    /// The FTB entry as trained by committed control instructions.
    pub const fn updated_entry(&self) -> &FtbEntry<N> {
        &self.updated_entry
    }

    /// The resolution state of this stream.
    pub const fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// The authoritative outcome: resolved if known, predicted otherwise.
    pub const fn outcome(&self) -> &StreamOutcome {
        self.resolution.authoritative()
    }

    /// The predicted outcome.
    pub const fn predicted(&self) -> &StreamOutcome {
        self.resolution.predicted()
    }

    /// The resolved outcome, if any.
    pub const fn exec(&self) -> Option<&StreamOutcome> {
        self.resolution.exec()
    }

    /// Whether the stream has been resolved at commit.
    pub const fn resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    /// Whether a branch of the stream is taken.
    pub const fn taken(&self) -> bool {
        self.outcome().has_taken_branch
    }

    /// Same as [`FetchStream::taken`].
    pub const fn is_taken(&self) -> bool {
        self.taken()
    }

    /// The controlling branch.
    pub const fn branch_info(&self) -> BranchInfo {
        self.outcome().branch
    }

    /// Address of the controlling branch.
    pub const fn control_pc(&self) -> u64 {
        self.branch_info().pc()
    }

    /// Target of the controlling branch.
    pub const fn taken_target(&self) -> u64 {
        self.branch_info().target()
    }

    /// Address of the taken branch, from the authoritative outcome.
    pub const fn taken_branch_pc(&self) -> u64 {
        self.outcome().taken_branch_pc
    }

    /// Target of the taken branch, from the authoritative outcome.
    pub const fn target_pc(&self) -> u64 {
        self.outcome().target_pc
    }

    /// Resolved `has_branch`; `false` while unresolved.
    pub fn exec_has_branch(&self) -> bool {
        self.exec().is_some_and(|e| e.has_branch)
    }

    /// Resolved `has_taken_branch`; `false` while unresolved.
    pub fn exec_has_taken_branch(&self) -> bool {
        self.exec().is_some_and(|e| e.has_taken_branch)
    }

    /// Resolved taken-branch address; `0` while unresolved.
    pub fn exec_taken_branch_pc(&self) -> u64 {
        self.exec().map_or(0, |e| e.taken_branch_pc)
    }

    /// Resolved branch target; `0` while unresolved.
    pub fn exec_target_branch_pc(&self) -> u64 {
        self.exec().map_or(0, |e| e.target_pc)
    }

    /// Resolved fallthrough address; `0` while unresolved.
    pub fn exec_fallthrough_pc(&self) -> u64 {
        self.exec().map_or(0, |e| e.fallthrough_pc)
    }

    /// Sequence number of the first instruction fetched under this stream.
    pub const fn first_inst_seq(&self) -> InstSeqNum {
        self.first_inst_seq
    }

    /// Sequence number of the last instruction fetched under this stream.
    pub const fn last_inst_seq(&self) -> InstSeqNum {
        self.last_inst_seq
    }

    /// Sequence number of the last committed instruction of this stream.
    pub const fn last_committed_inst_seq(&self) -> InstSeqNum {
        self.last_committed_inst_seq
    }

    /// Whether every fetched instruction of this stream has committed.
    ///
    /// A stream with no fetched instructions is never finished.
    pub fn finished(&self) -> bool {
        !self.last_inst_seq.is_unset() && self.last_committed_inst_seq == self.last_inst_seq
    }

    /// End of the predicted fetch range: just past the taken branch, or the
    /// fallthrough address when nothing is predicted taken.
    pub const fn end_pc(&self) -> u64 {
        let pred = self.predicted();
        if pred.has_taken_branch {
            pred.branch.end()
        } else {
            pred.fallthrough_pc
        }
    }

    /// Whether the prediction turned out wrong.
    ///
    /// A resolved stream is mispredicted when taken-ness, the taken branch or
    /// its target differ from the prediction. An unresolved stream is
    /// mispredicted once finished if it was predicted taken, since every
    /// instruction committed without control leaving the block.
    pub fn mispredicted(&self) -> bool {
        match &self.resolution {
            Resolution::Resolved { predicted, exec } => {
                predicted.has_taken_branch != exec.has_taken_branch
                    || (exec.has_taken_branch
                        && (predicted.taken_branch_pc != exec.taken_branch_pc
                            || predicted.target_pc != exec.target_pc))
            }
            Resolution::Predicted(pred) => self.finished() && pred.has_taken_branch,
        }
    }
}
