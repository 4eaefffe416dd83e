use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::ParseIdError;

const DEVICE_PREFIX: &str = "device";
const SAMPLE_PREFIX: &str = "sample";

/// Identifier of a device. Devices are the only nodes that own slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u64);

/// Identifier of a sample. Samples are always leaves of the composition graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleId(pub u64);

/// Either side of an edge target.
///
/// The text encoding (`device:<n>` / `sample:<n>`) carries the kind, so an id
/// read from a file always parses back into the right variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    /// A device node.
    Device(DeviceId),
    /// A sample node.
    Sample(SampleId),
}

impl NodeId {
    /// Returns the device id if this node is a device.
    pub fn as_device(self) -> Option<DeviceId> {
        match self {
            NodeId::Device(id) => Some(id),
            NodeId::Sample(_) => None,
        }
    }

    /// Returns the sample id if this node is a sample.
    pub fn as_sample(self) -> Option<SampleId> {
        match self {
            NodeId::Sample(id) => Some(id),
            NodeId::Device(_) => None,
        }
    }
}

impl From<DeviceId> for NodeId {
    fn from(id: DeviceId) -> Self {
        NodeId::Device(id)
    }
}

impl From<SampleId> for NodeId {
    fn from(id: SampleId) -> Self {
        NodeId::Sample(id)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DEVICE_PREFIX}:{}", self.0)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SAMPLE_PREFIX}:{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Device(id) => id.fmt(f),
            NodeId::Sample(id) => id.fmt(f),
        }
    }
}

impl FromStr for NodeId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, raw) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseIdError::new(s, "expected '<kind>:<number>'"))?;
        let value: u64 = raw
            .parse()
            .map_err(|_| ParseIdError::new(s, "id must be an unsigned integer"))?;
        match kind {
            DEVICE_PREFIX => Ok(NodeId::Device(DeviceId(value))),
            SAMPLE_PREFIX => Ok(NodeId::Sample(SampleId(value))),
            _ => Err(ParseIdError::new(s, "kind must be 'device' or 'sample'")),
        }
    }
}

impl FromStr for DeviceId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NodeId>()?
            .as_device()
            .ok_or_else(|| ParseIdError::new(s, "expected a device id"))
    }
}

impl FromStr for SampleId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NodeId>()?
            .as_sample()
            .ok_or_else(|| ParseIdError::new(s, "expected a sample id"))
    }
}

macro_rules! serialize_as_text {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_text!(DeviceId, SampleId, NodeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_encoding_carries_kind() {
        assert_eq!(
            "device:7".parse::<NodeId>().unwrap(),
            NodeId::Device(DeviceId(7))
        );
        assert_eq!(
            "sample:3".parse::<NodeId>().unwrap(),
            NodeId::Sample(SampleId(3))
        );
        assert_eq!(NodeId::Device(DeviceId(12)).to_string(), "device:12");
    }

    #[test]
    fn rejects_unknown_kind_and_mismatched_parse() {
        assert!("widget:1".parse::<NodeId>().is_err());
        assert!("device:-1".parse::<NodeId>().is_err());
        assert!("device".parse::<NodeId>().is_err());
        assert!("sample:1".parse::<DeviceId>().is_err());
        assert_eq!("sample:1".parse::<SampleId>().unwrap(), SampleId(1));
    }
}
