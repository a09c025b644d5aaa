// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage Row Mapping
//!
//! Pure conversions between the engine's types and flat rows a storage
//! collaborator can persist. No I/O happens here: the collaborator reads and
//! writes rows however it likes (typically via the write-through
//! [`RecordHook`](crate::history::RecordHook)) and this module translates.
//!
//! The unbounded MIN/MAX sentinels are encoded as NULL bounds in history
//! rows; perspective rows always carry concrete, non-null bounds, storing
//! the sentinel instants themselves when a span is unbounded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Effective, TimePoint, TimeRange};
use crate::errors::{TemporalError, TemporalResult};
use crate::history::{History, HistoryEntry};
use crate::perspective::{Perspective, PerspectiveEntry};

/// Encode a range start for storage: the MIN sentinel becomes NULL
pub fn start_to_column(point: TimePoint) -> Option<DateTime<Utc>> {
    if point.is_min() {
        None
    } else {
        Some(point.as_datetime())
    }
}

/// Encode a range end for storage: the MAX sentinel becomes NULL
pub fn end_to_column(point: TimePoint) -> Option<DateTime<Utc>> {
    if point.is_max() {
        None
    } else {
        Some(point.as_datetime())
    }
}

/// Decode a stored range start: NULL means unbounded past
pub fn start_from_column(column: Option<DateTime<Utc>>) -> TimePoint {
    column.map(TimePoint::new).unwrap_or_else(TimePoint::min)
}

/// Decode a stored range end: NULL means unbounded future
pub fn end_from_column(column: Option<DateTime<Utc>>) -> TimePoint {
    column.map(TimePoint::new).unwrap_or_else(TimePoint::max)
}

/// Stored form of one [`HistoryEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryRow<T> {
    /// Effectivity start; NULL encodes the unbounded-past sentinel
    pub start_at: Option<DateTime<Utc>>,
    /// Effectivity end; NULL encodes the unbounded-future sentinel
    pub end_at: Option<DateTime<Utc>>,
    /// Whether this row is a retraction
    pub is_forgotten: bool,
    /// The recorded value; absent for retractions
    pub value: Option<T>,
    /// Settlement instant (transaction time)
    pub settled_at: DateTime<Utc>,
    /// Sequential version within the entity's log; unique per entity
    pub version: u64,
}

impl<T: Clone> HistoryEntryRow<T> {
    /// Flatten an entry into its stored form
    pub fn from_entry(entry: &HistoryEntry<T>) -> Self {
        Self {
            start_at: start_to_column(entry.effectivity().start()),
            end_at: end_to_column(entry.effectivity().end()),
            is_forgotten: entry.is_forgotten(),
            value: entry.value_opt().cloned(),
            settled_at: entry.settled_at().as_datetime(),
            version: entry.version(),
        }
    }
}

impl<T> HistoryEntryRow<T> {
    /// Reconstruct the entry this row was flattened from
    ///
    /// # Errors
    ///
    /// [`TemporalError::InvalidRange`] for inverted stored bounds;
    /// [`TemporalError::MalformedHistory`] for a non-retraction row with no
    /// value. Both signal corrupted storage.
    pub fn into_entry(self) -> TemporalResult<HistoryEntry<T>> {
        let effectivity = TimeRange::new(
            start_from_column(self.start_at),
            end_from_column(self.end_at),
        )?;
        let settled_at = TimePoint::new(self.settled_at);

        if self.is_forgotten {
            return Ok(HistoryEntry::forgotten(effectivity, settled_at, self.version));
        }
        match self.value {
            Some(value) => Ok(HistoryEntry::known(value, effectivity, settled_at, self.version)),
            None => Err(TemporalError::MalformedHistory(format!(
                "row at version {} carries no value and is not forgotten",
                self.version,
            ))),
        }
    }
}

/// Stored form of one [`PerspectiveEntry`]: non-null bounds plus the value
///
/// Unlike history rows, both bounds are always concrete: an unbounded span
/// stores the sentinel instant itself rather than NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveEntryRow<T> {
    /// Effectivity start; the MIN sentinel instant when unbounded
    pub start_at: DateTime<Utc>,
    /// Effectivity end; the MAX sentinel instant when unbounded
    pub end_at: DateTime<Utc>,
    /// The resolved value over the span
    pub value: T,
}

impl<T: Clone> PerspectiveEntryRow<T> {
    /// Flatten a perspective entry into its stored form
    pub fn from_entry(entry: &PerspectiveEntry<T>) -> Self {
        Self {
            start_at: entry.effectivity().start().as_datetime(),
            end_at: entry.effectivity().end().as_datetime(),
            value: entry.value().clone(),
        }
    }
}

impl<T> PerspectiveEntryRow<T> {
    /// Reconstruct the perspective entry this row was flattened from
    pub fn into_entry(self) -> TemporalResult<PerspectiveEntry<T>> {
        let effectivity = TimeRange::new(
            TimePoint::new(self.start_at),
            TimePoint::new(self.end_at),
        )?;
        Ok(PerspectiveEntry::new(effectivity, self.value))
    }
}

/// Rebuild a history from stored rows, revalidating its invariants
pub fn history_from_rows<T>(
    id: impl Into<String>,
    rows: Vec<HistoryEntryRow<T>>,
) -> TemporalResult<History<T>> {
    let entries = rows
        .into_iter()
        .map(HistoryEntryRow::into_entry)
        .collect::<TemporalResult<Vec<_>>>()?;
    History::with_entries(id, entries)
}

/// Flatten a history's log into stored rows, in append order
pub fn history_to_rows<T: Clone>(history: &History<T>) -> Vec<HistoryEntryRow<T>> {
    history.iter().map(HistoryEntryRow::from_entry).collect()
}

/// Rebuild a perspective from stored rows, revalidating its invariants
pub fn perspective_from_rows<T: PartialEq>(
    settled_at: DateTime<Utc>,
    rows: Vec<PerspectiveEntryRow<T>>,
) -> TemporalResult<Perspective<T>> {
    let entries = rows
        .into_iter()
        .map(PerspectiveEntryRow::into_entry)
        .collect::<TemporalResult<Vec<_>>>()?;
    Perspective::new(TimePoint::new(settled_at), entries)
}

/// Flatten a perspective into stored rows, in valid-time order
pub fn perspective_to_rows<T: Clone>(perspective: &Perspective<T>) -> Vec<PerspectiveEntryRow<T>> {
    perspective.iter().map(PerspectiveEntryRow::from_entry).collect()
}
