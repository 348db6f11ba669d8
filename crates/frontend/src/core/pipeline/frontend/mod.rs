//! Decoupled frontend bookkeeping.
//!
//! The frontend sits between the branch predictor and the fetch stage:
//! Prediction -> Stream -> Fetch targets -> Fetch ... Commit -> Stream retirement
//!
//! Streams are owned by the [`StreamArena`] and referred to by id everywhere
//! else.

pub mod arena;
pub mod fetch_target;
pub mod stream;

pub use arena::StreamArena;
pub use fetch_target::{FetchTargetEntry, split_stream};
pub use stream::{FetchStream, Resolution, StreamOutcome};
