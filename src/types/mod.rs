//! Identifiers, timestamps and slot paths shared by every layer of the crate.

mod error;
mod ids;
mod path;
mod timestamp;

pub use error::{ParseIdError, ParseTimestampError};
pub use ids::{DeviceId, NodeId, SampleId};
pub use path::SlotPath;
pub use timestamp::Timestamp;
