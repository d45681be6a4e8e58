//! Round-trip execution engine
//!
//! Value generation, the per-iteration runner, and the driver loop.

mod driver;
mod runner;
mod sequence;

pub use driver::Driver;
