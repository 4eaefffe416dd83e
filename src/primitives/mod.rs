//! Low-level building blocks used by the traversal engine.

pub mod interval;

pub use interval::{merge, narrow, IntervalError, TimeInterval, Timeframe};
