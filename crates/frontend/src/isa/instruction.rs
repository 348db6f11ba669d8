//! Instruction interfaces consumed by the frontend.
//!
//! The frontend never decodes instructions itself. Decode and the in-flight
//! instruction machinery live elsewhere in the pipeline model and are seen
//! here only through two traits:
//! 1. **`StaticInst`:** Capability queries of a decoded instruction, used to
//!    classify branches when a `BranchInfo` is built.
//! 2. **`DynInst`:** An in-flight instruction at commit, which additionally
//!    knows its resolved program-counter transition.

/// Capability queries answered by a static (decoded) instruction.
///
/// Only the control-flow related queries needed for branch classification
/// are part of this interface.
pub trait StaticInst {
    /// Returns `true` for conditional control-flow instructions.
    fn is_cond_ctrl(&self) -> bool;

    /// Returns `true` for control-flow instructions whose target comes from a register.
    fn is_indirect_ctrl(&self) -> bool;

    /// Returns `true` for unconditional control-flow instructions.
    fn is_uncond_ctrl(&self) -> bool;

    /// Returns `true` for procedure calls.
    fn is_call(&self) -> bool;

    /// Returns `true` for procedure returns.
    fn is_return(&self) -> bool;

    /// Returns `true` for instructions that must not execute speculatively.
    fn is_non_speculative(&self) -> bool;

    /// Returns `true` for control-flow instructions with an encoded target.
    fn is_direct_ctrl(&self) -> bool;
}

/// The resolved program-counter transition of a committed instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PcTransition {
    /// Address of the instruction.
    pub pc: u64,
    /// Address of the instruction that followed it in program order.
    pub npc: u64,
    /// Encoded size of the instruction in bytes.
    pub size: u8,
}

impl PcTransition {
    /// Creates a transition from `pc` to `npc` for an instruction of `size` bytes.
    pub const fn new(pc: u64, npc: u64, size: u8) -> Self {
        Self { pc, npc, size }
    }

    /// Returns the address immediately after the instruction.
    #[inline]
    pub const fn fallthrough(&self) -> u64 {
        self.pc.wrapping_add(self.size as u64)
    }

    /// Returns `true` if control left the sequential path (the branch was taken).
    #[inline]
    pub const fn branching(&self) -> bool {
        self.npc != self.fallthrough()
    }
}

/// An in-flight instruction handle, as seen at commit.
///
/// The handle answers the same capability queries as its static instruction
/// and exposes the program-counter transition it actually took.
pub trait DynInst: StaticInst {
    /// Returns the resolved program-counter transition of this instruction.
    fn pc_state(&self) -> PcTransition;
}
