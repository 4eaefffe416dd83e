//! Time-aware composition queries over devices and samples.
//!
//! Devices hold other devices and samples in named slots, each for a
//! half-open interval of time. [`Composition`] answers which samples were
//! used together with a device, which devices touched a sample, where a
//! node sat at the top of its ownership chain, and which device filled a
//! slot path over a window.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod primitives;
pub mod storage;
pub mod traversal;
pub mod types;

pub use config::{ConfigError, TraversalConfig};
pub use error::{CompositionError, Result};
pub use primitives::{IntervalError, TimeInterval, Timeframe};
pub use storage::{Edge, EdgeStore, MemoryEdgeStore, StoreError};
pub use traversal::{check_window, Composition, Hit, Properties, Root, Usage};
pub use types::{DeviceId, NodeId, SampleId, SlotPath, Timestamp};
