//! Fetch Target Buffer (FTB) entries.
//!
//! An FTB entry describes one fetch block: up to `N` branches that live in
//! the block, the address reached when none of them is taken, and the
//! tag/thread that own the entry. The lookup and training mechanism that
//! stores entries is outside this crate; this module only defines the entry
//! shape and the queries made on it.
//!
//! Slots are stored in a fixed-size array so an entry can never describe more
//! branches than its configured capacity. Slots may be sparse: an invalid
//! slot keeps its old contents but is ignored by every query.

use tracing::trace;

use super::branch_info::{BranchInfo, BranchSlot};
use crate::common::{FrontendError, Result, ThreadId};
use crate::config::FtbConfig;

/// An entry of the Fetch Target Buffer with `N` branch slots.
///
/// Equality compares the fallthrough address, the valid bit and the slots in
/// order. `tag`, `tid` and the block span are left out, so two
/// entries with the same contents compare equal regardless of who owns them;
/// see [`FtbEntry::same_identity`].
#[derive(Clone, Debug)]
pub struct FtbEntry<const N: usize> {
    /// Address-derived lookup key.
    pub tag: u64,
    /// Owning hardware thread.
    pub tid: ThreadId,
    /// Address reached if no branch in the block is taken.
    pub fallthrough_pc: u64,
    /// Whether this entry holds a prediction.
    pub valid: bool,
    /// Branch slots, possibly sparse.
    pub slots: [BranchSlot; N],
    /// Maximum block span in bytes, used by `is_reasonable`.
    max_span: u64,
}

impl<const N: usize> Default for FtbEntry<N> {
    fn default() -> Self {
        Self {
            tag: 0,
            tid: 0,
            fallthrough_pc: 0,
            valid: false,
            slots: [BranchSlot::default(); N],
            max_span: FtbConfig::default().max_block_span,
        }
    }
}

impl<const N: usize> FtbEntry<N> {
    /// Number of branch slots in every entry of this type.
    pub const SLOTS: usize = N;

    /// Creates a valid entry holding `branches` in its first slots.
    ///
    /// Remaining slots are left empty. The block span is the default one;
    /// use [`FtbEntry::from_config`] or [`FtbEntry::with_max_span`] to change it.
    ///
    /// # Errors
    ///
    /// * [`FrontendError::InvalidSlotCount`] if `N` is zero.
    /// * [`FrontendError::TooManyBranches`] if `branches` does not fit.
    pub fn new(
        tag: u64,
        tid: ThreadId,
        fallthrough_pc: u64,
        branches: &[BranchInfo],
    ) -> Result<Self> {
        if N == 0 {
            return Err(FrontendError::InvalidSlotCount);
        }
        if branches.len() > N {
            return Err(FrontendError::TooManyBranches {
                count: branches.len(),
                capacity: N,
            });
        }

        let mut slots = [BranchSlot::default(); N];
        for (slot, info) in slots.iter_mut().zip(branches) {
            *slot = BranchSlot::from(*info);
        }

        Ok(Self {
            tag,
            tid,
            fallthrough_pc,
            valid: true,
            slots,
            ..Self::default()
        })
    }

    /// Creates an entry like [`FtbEntry::new`], using the configured block span.
    ///
    /// # Errors
    ///
    /// Same as [`FtbEntry::new`].
    pub fn from_config(
        cfg: &FtbConfig,
        tag: u64,
        tid: ThreadId,
        fallthrough_pc: u64,
        branches: &[BranchInfo],
    ) -> Result<Self> {
        Ok(Self::new(tag, tid, fallthrough_pc, branches)?.with_max_span(cfg.max_block_span))
    }

    /// Returns the entry with a different maximum block span.
    #[must_use]
    pub const fn with_max_span(mut self, max_span: u64) -> Self {
        self.max_span = max_span;
        self
    }

    /// Maximum block span in bytes.
    #[inline]
    pub const fn max_span(&self) -> u64 {
        self.max_span
    }

    /// Compares the owning tag and thread, which `==` ignores.
    pub const fn same_identity(&self, other: &Self) -> bool {
        self.tag == other.tag && self.tid == other.tid
    }

    /// All slots, occupied or not.
    #[inline]
    pub const fn slots(&self) -> &[BranchSlot; N] {
        &self.slots
    }

    /// Returns the slot at `idx`, if in range.
    pub fn slot(&self, idx: usize) -> Option<&BranchSlot> {
        self.slots.get(idx)
    }

    /// Returns the slot at `idx` mutably, if in range.
    pub fn slot_mut(&mut self, idx: usize) -> Option<&mut BranchSlot> {
        self.slots.get_mut(idx)
    }

    /// Iterates over the occupied slots in slot order.
    pub fn valid_slots(&self) -> impl Iterator<Item = &BranchSlot> {
        self.slots.iter().filter(|s| s.is_valid())
    }

    /// Returns the number of occupied slots.
    pub fn valid_slot_num(&self) -> usize {
        self.valid_slots().count()
    }

    /// Returns the number of occupied slots whose branch lies before `pc`.
    ///
    /// This is the ordinal position of a branch at `pc` within the block.
    pub fn valid_slot_num_before(&self, pc: u64) -> usize {
        self.valid_slots().filter(|s| s.pc() < pc).count()
    }

    /// Returns the index of the occupied slot holding the branch at `pc`.
    ///
    /// If several occupied slots share the address, the first one wins.
    pub fn slot_idx(&self, pc: u64) -> Option<usize> {
        self.slots.iter().position(|s| s.is_valid() && s.pc() == pc)
    }

    /// Checks that this entry can describe a fetch block starting at `start`.
    ///
    /// Every occupied slot and the fallthrough address must lie in
    /// `(start, start + max_span]`. A `false` result means the entry is
    /// mis-tagged or corrupted; acting on it is the caller's business.
    pub fn is_reasonable(&self, start: u64) -> bool {
        let max = start.saturating_add(self.max_span);
        let in_block = |pc: u64| pc > start && pc <= max;

        let reasonable =
            self.valid_slots().all(|s| in_block(s.pc())) && in_block(self.fallthrough_pc);
        if !reasonable {
            trace!(
                "FTB entry tag={:#x} outside fetch block at {start:#x} (fallthrough {:#x})",
                self.tag,
                self.fallthrough_pc
            );
        }
        reasonable
    }

    /// Records a branch in the entry.
    ///
    /// A branch already present is left untouched. Otherwise it takes the
    /// first empty slot and occupied slots are kept sorted by address.
    ///
    /// # Returns
    ///
    /// `true` if the branch is present after the call, `false` if every slot
    /// was already occupied by other branches.
    pub fn insert_branch(&mut self, info: BranchInfo) -> bool {
        if self.slot_idx(info.pc()).is_some() {
            return true;
        }
        let Some(free) = self.slots.iter().position(|s| !s.is_valid()) else {
            return false;
        };
        self.slots[free] = BranchSlot::from(info);
        self.slots.sort_by_key(|s| (!s.is_valid(), s.pc()));
        true
    }
}

impl<const N: usize> PartialEq for FtbEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.fallthrough_pc == other.fallthrough_pc
            && self.valid == other.valid
            && self.slots == other.slots
    }
}

impl<const N: usize> Eq for FtbEntry<N> {}
