//! Prediction-side units.
//!
//! The frontend only carries the branch prediction unit's data structures;
//! the predictors that fill them live with the driving simulator.

/// Branch prediction unit structures (branch slots and FTB entries).
pub mod bru;
