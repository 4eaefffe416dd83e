use thiserror::Error;

/// Text did not encode a `device:<n>` / `sample:<n>` identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid node id '{input}': {reason}")]
pub struct ParseIdError {
    /// Offending input.
    pub input: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl ParseIdError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_owned(),
            reason,
        }
    }
}

/// Text was neither an integer millisecond count nor RFC 3339.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid timestamp '{input}': {reason}")]
pub struct ParseTimestampError {
    /// Offending input.
    pub input: String,
    /// Parser message.
    pub reason: String,
}
