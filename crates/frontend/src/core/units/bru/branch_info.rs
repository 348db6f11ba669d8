//! Branch descriptions and branch-buffer slots.
//!
//! A `BranchInfo` is an immutable description of one control-flow
//! instruction: where it is, where it goes, how big it is, and what kind of
//! branch it is. A `BranchSlot` wraps a `BranchInfo` with the bookkeeping an
//! FTB entry keeps per branch (occupancy and the always-taken bias).
//!
//! Equality and ordering of `BranchInfo` look only at the branch address, so
//! that slots can be searched and sorted by address. Use
//! [`BranchInfo::same_fields`] for a full comparison.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::isa::StaticInst;

/// Classification of a control-flow instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Unconditional direct jump.
    Unconditional,
    /// Conditional branch.
    Conditional,
    /// Indirect jump.
    Indirect,
    /// Procedure call.
    Call,
    /// Procedure return.
    Return,
    /// System call.
    Syscall,
    /// Return from a system call.
    Sysret,
    /// Anything not covered above.
    #[default]
    Other,
}

impl BranchKind {
    /// Classifies a static instruction.
    ///
    /// Queries are tested in a fixed priority order and the first match wins:
    /// conditional, indirect, unconditional, call, then return (only when the
    /// instruction is speculative and not direct). Later queries are not
    /// evaluated once a match is found.
    pub fn classify<I: StaticInst + ?Sized>(inst: &I) -> Self {
        if inst.is_cond_ctrl() {
            Self::Conditional
        } else if inst.is_indirect_ctrl() {
            Self::Indirect
        } else if inst.is_uncond_ctrl() {
            Self::Unconditional
        } else if inst.is_call() {
            Self::Call
        } else if inst.is_return() && !inst.is_non_speculative() && !inst.is_direct_ctrl() {
            Self::Return
        } else {
            Self::Other
        }
    }
}

/// Immutable description of a control-flow instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchInfo {
    pc: u64,
    target: u64,
    size: u8,
    kind: BranchKind,
}

impl BranchInfo {
    /// Creates a branch description, classifying `inst` to obtain its kind.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction.
    /// * `target` - Target address of the branch.
    /// * `inst` - The static instruction, used only for classification.
    /// * `size` - Encoded size of the instruction in bytes.
    pub fn new<I: StaticInst + ?Sized>(pc: u64, target: u64, inst: &I, size: u8) -> Self {
        Self {
            pc,
            target,
            size,
            kind: BranchKind::classify(inst),
        }
    }

    /// Creates a branch description with an already known kind.
    pub const fn with_kind(pc: u64, target: u64, size: u8, kind: BranchKind) -> Self {
        Self {
            pc,
            target,
            size,
            kind,
        }
    }

    /// Address of the branch instruction.
    #[inline]
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Target address of the branch.
    #[inline]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Encoded size of the branch instruction in bytes.
    #[inline]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Kind of the branch.
    #[inline]
    pub const fn kind(&self) -> BranchKind {
        self.kind
    }

    /// Address of the instruction following the branch.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.pc.wrapping_add(self.size as u64)
    }

    /// Compares every field, unlike `==` which compares addresses only.
    pub fn same_fields(&self, other: &Self) -> bool {
        self.pc == other.pc
            && self.target == other.target
            && self.size == other.size
            && self.kind == other.kind
    }

    /// Unconditional direct jump.
    pub fn is_unconditional(&self) -> bool {
        self.kind == BranchKind::Unconditional
    }

    /// Conditional branch.
    pub fn is_conditional(&self) -> bool {
        self.kind == BranchKind::Conditional
    }

    /// Indirect jump.
    pub fn is_indirect(&self) -> bool {
        self.kind == BranchKind::Indirect
    }

    /// Procedure call.
    pub fn is_call(&self) -> bool {
        self.kind == BranchKind::Call
    }

    /// Procedure return.
    pub fn is_return(&self) -> bool {
        self.kind == BranchKind::Return
    }

    /// System call.
    pub fn is_syscall(&self) -> bool {
        self.kind == BranchKind::Syscall
    }

    /// Return from a system call.
    pub fn is_sysret(&self) -> bool {
        self.kind == BranchKind::Sysret
    }

    /// Not a recognised control-flow kind.
    pub fn is_other(&self) -> bool {
        self.kind == BranchKind::Other
    }
}

// Lookup equality: two descriptions of the same address are the same branch.
impl PartialEq for BranchInfo {
    fn eq(&self, other: &Self) -> bool {
        self.pc == other.pc
    }
}

impl Eq for BranchInfo {}

impl PartialOrd for BranchInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BranchInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pc.cmp(&other.pc)
    }
}

impl Hash for BranchInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pc.hash(state);
    }
}

/// A branch slot inside an FTB entry.
///
/// A default slot is empty. A slot built from a `BranchInfo` is occupied and
/// optimistically marked always-taken until the branch is seen not taken.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchSlot {
    info: BranchInfo,
    valid: bool,
    always_taken: bool,
}

impl From<BranchInfo> for BranchSlot {
    fn from(info: BranchInfo) -> Self {
        Self {
            info,
            valid: true,
            always_taken: true,
        }
    }
}

impl BranchSlot {
    /// The branch held by this slot. Still readable after `invalidate`.
    #[inline]
    pub const fn info(&self) -> &BranchInfo {
        &self.info
    }

    /// Address of the branch held by this slot.
    #[inline]
    pub const fn pc(&self) -> u64 {
        self.info.pc
    }

    /// Target address of the branch held by this slot.
    #[inline]
    pub const fn target(&self) -> u64 {
        self.info.target
    }

    /// Kind of the branch held by this slot.
    #[inline]
    pub const fn kind(&self) -> BranchKind {
        self.info.kind
    }

    /// Encoded size of the branch held by this slot.
    #[inline]
    pub const fn size(&self) -> u8 {
        self.info.size
    }

    /// Whether the slot is occupied.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the branch has been taken every time it was observed.
    #[inline]
    pub const fn always_taken(&self) -> bool {
        self.always_taken
    }

    /// Occupied and holding a conditional branch.
    pub fn cond_valid(&self) -> bool {
        self.valid && self.info.is_conditional()
    }

    /// Occupied and holding an unconditional branch.
    pub fn uncond_valid(&self) -> bool {
        self.valid && self.info.is_unconditional()
    }

    /// Marks the slot empty. The branch description is kept.
    pub const fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Marks the slot occupied again.
    pub const fn validate(&mut self) {
        self.valid = true;
    }

    /// Records that the branch was observed not taken. There is no way back.
    pub const fn unset_always_taken(&mut self) {
        self.always_taken = false;
    }
}

impl PartialEq for BranchSlot {
    fn eq(&self, other: &Self) -> bool {
        self.valid == other.valid
            && self.always_taken == other.always_taken
            && self.info.same_fields(&other.info)
    }
}

impl Eq for BranchSlot {}
