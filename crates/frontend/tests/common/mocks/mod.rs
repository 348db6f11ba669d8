
pub use inst::{MockInst, MockStatic, quiet_static};
