use thiserror::Error;

use crate::types::{DeviceId, Timestamp};

/// Failures reported by an [`EdgeStore`](super::EdgeStore) or while loading
/// edges into one.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// CSV reader error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A CSV record could not be turned into an edge.
    #[error("invalid edge record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the source file.
        line: u64,
        /// What was wrong with the record.
        reason: String,
    },
    /// The edge violates a structural invariant on its own.
    #[error("invalid edge: {0}")]
    InvalidEdge(String),
    /// Two edges would occupy the same slot at the same time.
    #[error("slot '{name}' of {owner} is already occupied at {at}")]
    SlotConflict {
        /// Owning device.
        owner: DeviceId,
        /// Slot name.
        name: String,
        /// First instant at which both edges are active.
        at: Timestamp,
    },
    /// Opaque backend failure.
    #[error("edge store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "Io",
            StoreError::Csv(_) => "Csv",
            StoreError::InvalidRecord { .. } => "InvalidRecord",
            StoreError::InvalidEdge(_) => "InvalidEdge",
            StoreError::SlotConflict { .. } => "SlotConflict",
            StoreError::Backend(_) => "Backend",
        }
    }
}
