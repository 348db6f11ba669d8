//! Instruction interfaces.
//!
//! Defines the static-descriptor and in-flight-handle traits through which the
//! frontend observes instructions produced by the rest of the pipeline.

/// Static instruction and in-flight instruction traits.
pub mod instruction;

pub use instruction::{DynInst, PcTransition, StaticInst};
