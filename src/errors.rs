//! Error types for temporal operations

use thiserror::Error;

use crate::domain::TimePoint;

/// Errors that can occur in temporal operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// Time range constructed with its end before its start
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange { start: TimePoint, end: TimePoint },

    /// History entries violate settlement order or sequential versioning
    #[error("Malformed history: {0}")]
    MalformedHistory(String),

    /// Perspective entries are not start-ordered or overlap
    #[error("Malformed perspective: {0}")]
    MalformedPerspective(String),

    /// No known, non-retracted value covers the requested instant
    #[error("No known value at {at}")]
    MissingValue { at: TimePoint },
}

impl TemporalError {
    /// Whether this error is an expected query outcome rather than a
    /// corrupted-invariant signal. Callers may recover from missing
    /// values; the malformed variants indicate bad data and should
    /// propagate.
    pub fn is_missing_value(&self) -> bool {
        matches!(self, TemporalError::MissingValue { .. })
    }
}

/// Result type for temporal operations
pub type TemporalResult<T> = Result<T, TemporalError>;
