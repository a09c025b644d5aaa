// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compacted Timeline of Best-Known Values
//!
//! A [`Perspective`] is the answer to "what did we believe the timeline
//! looked like, as of settlement instant S": a start-ordered, non-overlapping
//! sequence of resolved values over valid time. It is a derived snapshot,
//! rebuilt from a [`History`](crate::history::History) on request and never
//! patched incrementally; callers may cache one, but new appends to the
//! history invalidate it.
//!
//! Construction validates ordering and non-overlap, then compacts: adjacent
//! entries carrying equal values merge into their union, so the stored form
//! is the unique minimal representation of that knowledge.

use serde::{Deserialize, Serialize};

use crate::domain::{Effective, TimePoint, TimeRange};
use crate::errors::{TemporalError, TemporalResult};

/// One resolved span of a perspective: a value and the range it covers
///
/// Retractions never appear here; a retracted or never-recorded range is
/// simply a hole between entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveEntry<T> {
    effectivity: TimeRange,
    value: T,
}

impl<T> PerspectiveEntry<T> {
    /// Create a perspective entry
    pub fn new(effectivity: TimeRange, value: T) -> Self {
        Self { effectivity, value }
    }

    /// The resolved value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the entry, yielding its parts
    pub fn into_parts(self) -> (TimeRange, T) {
        (self.effectivity, self.value)
    }
}

impl<T> Effective for PerspectiveEntry<T> {
    fn effectivity(&self) -> &TimeRange {
        &self.effectivity
    }
}

/// A non-overlapping, compacted timeline as of a settlement cutoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective<T> {
    settled_at: TimePoint,
    entries: Vec<PerspectiveEntry<T>>,
}

impl<T: PartialEq> Perspective<T> {
    /// Build a perspective from start-ordered, non-overlapping entries
    ///
    /// Adjacent entries with equal values are merged during construction.
    ///
    /// # Errors
    ///
    /// [`TemporalError::MalformedPerspective`] when the entries are not
    /// sorted by effectivity start or any two of them overlap. This is
    /// unreachable for perspectives produced by
    /// [`History::get_perspective`](crate::history::History::get_perspective);
    /// seeing it there means corrupted input rows or an algorithm bug.
    pub fn new(
        settled_at: TimePoint,
        entries: Vec<PerspectiveEntry<T>>,
    ) -> TemporalResult<Self> {
        for pair in entries.windows(2) {
            if pair[1].effectivity().start() < pair[0].effectivity().start() {
                return Err(TemporalError::MalformedPerspective(format!(
                    "entry {} starts before its predecessor {}",
                    pair[1].effectivity(),
                    pair[0].effectivity(),
                )));
            }
            if pair[0].effectivity().end() >= pair[1].effectivity().start() {
                return Err(TemporalError::MalformedPerspective(format!(
                    "entries {} and {} overlap",
                    pair[0].effectivity(),
                    pair[1].effectivity(),
                )));
            }
        }

        Ok(Self {
            settled_at,
            entries: compact(entries),
        })
    }
}

impl<T> Perspective<T> {
    /// The settlement cutoff this perspective was materialized for
    pub fn settled_at(&self) -> TimePoint {
        self.settled_at
    }

    /// The compacted entries, sorted by effectivity start
    pub fn entries(&self) -> &[PerspectiveEntry<T>] {
        &self.entries
    }

    /// Iterate the entries in valid-time order
    pub fn iter(&self) -> std::slice::Iter<'_, PerspectiveEntry<T>> {
        self.entries.iter()
    }

    /// Number of compacted entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the perspective holds no values at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value effective at `at`
    ///
    /// # Errors
    ///
    /// [`TemporalError::MissingValue`] when no entry covers `at` - a hole
    /// left by a retraction or a range never recorded. This is an expected
    /// outcome, not a defect.
    pub fn fetch(&self, at: TimePoint) -> TemporalResult<&T> {
        self.entries
            .iter()
            .find(|entry| entry.is_effective_on(at))
            .map(PerspectiveEntry::value)
            .ok_or(TemporalError::MissingValue { at })
    }
}

impl<'a, T> IntoIterator for &'a Perspective<T> {
    type Item = &'a PerspectiveEntry<T>;
    type IntoIter = std::slice::Iter<'a, PerspectiveEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Merge runs of adjacent, equal-valued entries into single spans
///
/// The input is already sorted and non-overlapping, so a single left-to-right
/// pass reaches the fixed point: no adjacent equal-valued pair remains.
fn compact<T: PartialEq>(entries: Vec<PerspectiveEntry<T>>) -> Vec<PerspectiveEntry<T>> {
    let mut compacted: Vec<PerspectiveEntry<T>> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(last) = compacted.last() {
            if last.adjacent_to(&entry) && *last.value() == entry.value {
                let span = last.effectivity().hull(entry.effectivity());
                compacted.pop();
                compacted.push(PerspectiveEntry::new(span, entry.value));
                continue;
            }
        }
        compacted.push(entry);
    }
    compacted
}
