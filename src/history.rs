// Copyright (c) 2025 - Cowboy AI, Inc.
//! Append-Only Bitemporal History Log
//!
//! A [`History`] is the transaction-time log for one tracked property of one
//! entity. Every append is a new immutable [`HistoryEntry`]: either a value
//! effective over a valid-time range, or a retraction stating that nothing
//! is known for that range anymore. Entries are never updated or deleted;
//! corrections are simply later entries that win by settlement order.
//!
//! # Architecture
//!
//! ```text
//! record / forget → HistoryEntry → History (append-only log)
//!                                      ↓
//!                         fetch / get_perspective
//!                                      ↓
//!                        Perspective (derived snapshot)
//! ```
//!
//! # Log Requirements
//!
//! 1. **Append-Only**: entries are never removed or mutated
//! 2. **Ordered**: `settled_at` is non-decreasing along the log
//! 3. **Versioned**: versions are sequential from 0, assigned at append
//! 4. **Authoritative by settlement**: among entries covering an instant,
//!    the most recently settled one wins
//!
//! Concurrent appenders to the same entity id must be serialized externally
//! (see [`crate::lock`]); version assignment reads the last version and then
//! appends, which is not atomic.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{Effective, TimePoint, TimeRange};
use crate::errors::{TemporalError, TemporalResult};
use crate::perspective::{Perspective, PerspectiveEntry};

/// What a history entry asserts about its valid-time range
///
/// A sum type rather than a nullable value plus flag, so retraction handling
/// is exhaustive at every match site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload<T> {
    /// A value was in effect over the range
    Known(T),
    /// Nothing is known for the range anymore; prior knowledge is retracted
    Forgotten,
}

impl<T> Payload<T> {
    /// Whether this payload is a retraction
    pub fn is_forgotten(&self) -> bool {
        matches!(self, Payload::Forgotten)
    }

    /// The known value, if any
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Payload::Known(value) => Some(value),
            Payload::Forgotten => None,
        }
    }
}

/// One immutable, versioned fact in a history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry<T> {
    effectivity: TimeRange,
    settled_at: TimePoint,
    version: u64,
    payload: Payload<T>,
}

impl<T> HistoryEntry<T> {
    /// A positive fact: `value` was effective over `effectivity`
    pub fn known(value: T, effectivity: TimeRange, settled_at: TimePoint, version: u64) -> Self {
        Self {
            effectivity,
            settled_at,
            version,
            payload: Payload::Known(value),
        }
    }

    /// A retraction: no value is known over `effectivity`
    pub fn forgotten(effectivity: TimeRange, settled_at: TimePoint, version: u64) -> Self {
        Self {
            effectivity,
            settled_at,
            version,
            payload: Payload::Forgotten,
        }
    }

    /// When the system learned this fact (transaction time)
    pub fn settled_at(&self) -> TimePoint {
        self.settled_at
    }

    /// Zero-based position in the log, assigned at append time
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The asserted payload
    pub fn payload(&self) -> &Payload<T> {
        &self.payload
    }

    /// Whether this entry retracts rather than asserts
    pub fn is_forgotten(&self) -> bool {
        self.payload.is_forgotten()
    }

    /// The known value
    ///
    /// # Errors
    ///
    /// [`TemporalError::MissingValue`] when this entry is a retraction;
    /// the error carries the start of the retracted range.
    pub fn value(&self) -> TemporalResult<&T> {
        self.payload.as_known().ok_or(TemporalError::MissingValue {
            at: self.effectivity.start(),
        })
    }

    /// The known value, if this entry is not a retraction
    pub fn value_opt(&self) -> Option<&T> {
        self.payload.as_known()
    }
}

impl<T> Effective for HistoryEntry<T> {
    fn effectivity(&self) -> &TimeRange {
        &self.effectivity
    }
}

/// Write-through hook invoked synchronously after each successful append
///
/// A persistence collaborator can use this to mirror the new entry into
/// storage and refresh materialized projection rows. The hook receives the
/// appended entry and the whole history it now belongs to.
pub type RecordHook<T> = Box<dyn Fn(&HistoryEntry<T>, &History<T>) + Send + Sync>;

/// Append-only, per-entity log of versioned facts
///
/// # Examples
///
/// ```rust
/// use bitempo::domain::{TimePoint, TimeRange};
/// use bitempo::history::History;
///
/// let mut history: History<&str> = History::new("device-42/owner");
/// let acquired = TimePoint::now();
/// history.record("alice", TimeRange::since(acquired)).unwrap();
///
/// assert_eq!(history.fetch(acquired).unwrap(), &"alice");
/// assert!(history.fetch(acquired.prev()).is_err());
/// ```
pub struct History<T> {
    id: String,
    entries: Vec<HistoryEntry<T>>,
    on_record: Option<RecordHook<T>>,
}

impl<T> History<T> {
    /// An empty history for the given entity id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
            on_record: None,
        }
    }

    /// Rebuild a history from existing entries, verifying its invariants
    ///
    /// # Errors
    ///
    /// [`TemporalError::MalformedHistory`] when `settled_at` values are not
    /// non-decreasing or versions are not sequential from 0. Either signals
    /// corrupted caller-supplied or persisted data.
    pub fn with_entries(
        id: impl Into<String>,
        entries: Vec<HistoryEntry<T>>,
    ) -> TemporalResult<Self> {
        // Trust the entries' order... but verify.
        if let Some(first) = entries.first() {
            if first.version != 0 {
                return Err(TemporalError::MalformedHistory(format!(
                    "first entry has version {}, expected 0",
                    first.version,
                )));
            }
        }
        for pair in entries.windows(2) {
            if pair[0].settled_at > pair[1].settled_at {
                return Err(TemporalError::MalformedHistory(format!(
                    "settled_at must be non-decreasing, found {} after {}",
                    pair[1].settled_at, pair[0].settled_at,
                )));
            }
            if pair[1].version != pair[0].version + 1 {
                return Err(TemporalError::MalformedHistory(format!(
                    "version {} does not follow version {}",
                    pair[1].version, pair[0].version,
                )));
            }
        }

        Ok(Self {
            id: id.into(),
            entries,
            on_record: None,
        })
    }

    /// Attach a write-through hook, builder style
    pub fn with_record_hook(mut self, hook: RecordHook<T>) -> Self {
        self.on_record = Some(hook);
        self
    }

    /// The entity id this history belongs to
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The log in append order
    pub fn entries(&self) -> &[HistoryEntry<T>] {
        &self.entries
    }

    /// Iterate the log in append order
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry<T>> {
        self.entries.iter()
    }

    /// Number of entries in the log
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The version of the latest entry, if any
    pub fn last_version(&self) -> Option<u64> {
        self.entries.last().map(HistoryEntry::version)
    }

    /// Record that `value` was effective during `effectivity`, settled now
    pub fn record(&mut self, value: T, effectivity: TimeRange) -> TemporalResult<()> {
        self.record_at(value, effectivity, TimePoint::now())
    }

    /// Record a value with an explicit settlement instant
    ///
    /// Overlap with prior entries is the normal case, never an error;
    /// later-settled entries simply take precedence.
    ///
    /// # Errors
    ///
    /// [`TemporalError::MalformedHistory`] when `settled_at` precedes the
    /// latest entry's settlement, which would break the log ordering.
    pub fn record_at(
        &mut self,
        value: T,
        effectivity: TimeRange,
        settled_at: TimePoint,
    ) -> TemporalResult<()> {
        self.append(Payload::Known(value), effectivity, settled_at)
    }

    /// Retract all knowledge over `effectivity`, settled now
    pub fn forget(&mut self, effectivity: TimeRange) -> TemporalResult<()> {
        self.forget_at(effectivity, TimePoint::now())
    }

    /// Retract with an explicit settlement instant
    pub fn forget_at(
        &mut self,
        effectivity: TimeRange,
        settled_at: TimePoint,
    ) -> TemporalResult<()> {
        self.append(Payload::Forgotten, effectivity, settled_at)
    }

    /// The value effective at `at`, as of the latest settled knowledge
    ///
    /// # Errors
    ///
    /// [`TemporalError::MissingValue`] when no entry covers `at`, or the
    /// winning entry is a retraction. Expected and recoverable.
    pub fn fetch(&self, at: TimePoint) -> TemporalResult<&T> {
        self.fetch_as_of(at, TimePoint::now())
    }

    /// The value effective at `at`, using only knowledge settled by the cutoff
    ///
    /// Scans from the most recently settled entry backwards; the first entry
    /// covering `at` is by construction the most authoritative, so no
    /// explicit overlap search is needed.
    pub fn fetch_as_of(&self, at: TimePoint, settled_at: TimePoint) -> TemporalResult<&T> {
        for entry in self.entries_settled_by(settled_at) {
            if entry.is_effective_on(at) {
                trace!(
                    id = %self.id,
                    version = entry.version,
                    forgotten = entry.is_forgotten(),
                    "fetch resolved by entry"
                );
                return entry
                    .value_opt()
                    .ok_or(TemporalError::MissingValue { at });
            }
        }
        Err(TemporalError::MissingValue { at })
    }

    /// Materialize the compacted timeline of best-known values as of a cutoff
    ///
    /// Walks the log most-recently-settled-first, giving each entry only the
    /// valid-time ranges no higher-priority entry has claimed. An entry
    /// claims its full effectivity whether or not it is a retraction: a
    /// retraction blanks out that part of the timeline for everything
    /// settled before it, producing a hole rather than a value.
    pub fn get_perspective(&self, settled_at: TimePoint) -> TemporalResult<Perspective<T>>
    where
        T: Clone + PartialEq,
    {
        let mut claimed: Vec<TimeRange> = Vec::new();
        let mut resolved: Vec<PerspectiveEntry<T>> = Vec::new();

        for entry in self.entries_settled_by(settled_at) {
            for span in entry.effectivity.subtract_all(&claimed) {
                if let Payload::Known(value) = &entry.payload {
                    resolved.push(PerspectiveEntry::new(span, value.clone()));
                }
            }
            claimed.push(entry.effectivity);
        }

        resolved.sort_by_key(|entry| entry.effectivity().start());
        trace!(id = %self.id, spans = resolved.len(), "materialized perspective");
        Perspective::new(settled_at, resolved)
    }

    /// Entries settled no later than the cutoff, most recently settled first
    ///
    /// Among entries with equal `settled_at`, the later-appended (higher
    /// version) one comes first, so corrections within the same second still
    /// win.
    fn entries_settled_by(
        &self,
        settled_at: TimePoint,
    ) -> impl Iterator<Item = &HistoryEntry<T>> + '_ {
        self.entries
            .iter()
            .rev()
            .filter(move |entry| entry.settled_at <= settled_at)
    }

    fn append(
        &mut self,
        payload: Payload<T>,
        effectivity: TimeRange,
        settled_at: TimePoint,
    ) -> TemporalResult<()> {
        if let Some(last) = self.entries.last() {
            if settled_at < last.settled_at {
                return Err(TemporalError::MalformedHistory(format!(
                    "settlement {} precedes the latest settlement {}",
                    settled_at, last.settled_at,
                )));
            }
        }

        let entry = HistoryEntry {
            effectivity,
            settled_at,
            version: self.next_version(),
            payload,
        };
        debug!(
            id = %self.id,
            version = entry.version,
            effectivity = %entry.effectivity,
            forgotten = entry.is_forgotten(),
            "appended history entry"
        );
        self.entries.push(entry);
        self.notify_last();
        Ok(())
    }

    fn notify_last(&self) {
        if let (Some(hook), Some(entry)) = (self.on_record.as_ref(), self.entries.last()) {
            hook(entry, self);
        }
    }

    fn next_version(&self) -> u64 {
        self.entries.last().map_or(0, |entry| entry.version + 1)
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("id", &self.id)
            .field("entries", &self.entries)
            .field("on_record", &self.on_record.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = &'a HistoryEntry<T>;
    type IntoIter = std::slice::Iter<'a, HistoryEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
