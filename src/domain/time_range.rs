// Copyright (c) 2025 - Cowboy AI, Inc.
//! Closed Time Interval with Set Algebra
//!
//! [`TimeRange`] is a closed, inclusive interval of [`TimePoint`] with the
//! operations the history engine is built on: containment, overlap,
//! adjacency, intersection, union, and subtraction. Adjacency is defined by
//! the one-second granularity step, which keeps union and compaction
//! well-defined without zero-width gaps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::TimePoint;
use crate::errors::{TemporalError, TemporalResult};

/// A closed interval `[start, end]` over [`TimePoint`]
///
/// Invariant: `start <= end`, enforced by [`TimeRange::new`]. The default
/// range is unbounded on both sides (`[MIN, MAX]`).
///
/// # Examples
///
/// ```rust
/// use bitempo::domain::{TimePoint, TimeRange};
///
/// let now = TimePoint::now();
/// let open_ended = TimeRange::since(now);
/// assert!(open_ended.contains(now));
/// assert!(open_ended.contains(TimePoint::max()));
///
/// // end before start is rejected
/// assert!(TimeRange::new(now, now.prev()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: TimePoint,
    end: TimePoint,
}

impl TimeRange {
    /// Create a range with validation
    ///
    /// # Errors
    ///
    /// [`TemporalError::InvalidRange`] when `end < start`.
    pub fn new(start: TimePoint, end: TimePoint) -> TemporalResult<Self> {
        if end < start {
            return Err(TemporalError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The unbounded range `[MIN, MAX]`
    pub fn unbounded() -> Self {
        Self {
            start: TimePoint::min(),
            end: TimePoint::max(),
        }
    }

    /// `[start, MAX]` — effective from `start` onwards
    pub fn since(start: TimePoint) -> Self {
        Self {
            start,
            end: TimePoint::max(),
        }
    }

    /// `[MIN, end]` — effective up to and including `end`
    pub fn until(end: TimePoint) -> Self {
        Self {
            start: TimePoint::min(),
            end,
        }
    }

    /// Whole-day inclusive range: `start` at 00:00:00 through `end` at 23:59:59
    pub fn from_dates(start: chrono::NaiveDate, end: chrono::NaiveDate) -> TemporalResult<Self> {
        Self::new(
            TimePoint::from_date(start),
            TimePoint::from_date(end).add_days(1).prev(),
        )
    }

    /// Inclusive lower bound
    pub fn start(&self) -> TimePoint {
        self.start
    }

    /// Inclusive upper bound
    pub fn end(&self) -> TimePoint {
        self.end
    }

    /// Whether `at` falls within the closed interval
    pub fn contains(&self, at: TimePoint) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether `self` lies entirely within `other`
    pub fn included_in(&self, other: &TimeRange) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Whether `self` ends strictly before `other` starts
    pub fn is_before(&self, other: &TimeRange) -> bool {
        self.end < other.start
    }

    /// Whether `self` starts strictly after `other` ends
    pub fn is_after(&self, other: &TimeRange) -> bool {
        self.start > other.end
    }

    /// Whether the two ranges share at least one point
    pub fn overlap_with(&self, other: &TimeRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Whether the two ranges are disjoint and exactly one second apart
    pub fn adjacent_to(&self, other: &TimeRange) -> bool {
        if self.is_before(other) {
            self.end.next() == other.start
        } else if other.is_before(self) {
            other.end.next() == self.start
        } else {
            false
        }
    }

    /// The shared sub-range, if the ranges overlap
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.overlap_with(other) {
            return None;
        }
        Some(Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// The combined range, if the ranges overlap or are adjacent
    pub fn union(&self, other: &TimeRange) -> Option<TimeRange> {
        if self.overlap_with(other) || self.adjacent_to(other) {
            Some(self.hull(other))
        } else {
            None
        }
    }

    /// Smallest range covering both inputs; callers must have established
    /// overlap or adjacency, otherwise the hull covers the gap as well.
    pub(crate) fn hull(&self, other: &TimeRange) -> TimeRange {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The parts of `self` left after removing the overlap with `other`
    ///
    /// Returns `self` unchanged when the ranges are disjoint; otherwise up
    /// to two remainders, one on each side of `other`. The one-second steps
    /// are safe: a side only remains when the corresponding bound of
    /// `other` lies strictly inside `self`, so it cannot be a sentinel on
    /// the stepped side.
    pub fn subtract(&self, other: &TimeRange) -> Vec<TimeRange> {
        if !self.overlap_with(other) {
            return vec![*self];
        }
        let mut remainders = Vec::with_capacity(2);
        if self.start < other.start {
            remainders.push(Self {
                start: self.start,
                end: other.start.prev(),
            });
        }
        if self.end > other.end {
            remainders.push(Self {
                start: other.end.next(),
                end: self.end,
            });
        }
        remainders
    }

    /// The parts of `self` not covered by any of `others`
    ///
    /// Boundary sweep: clip each subtrahend to `self`, coalesce the covered
    /// spans, then emit the maximal uncovered gaps in start order. The
    /// result is a minimal set of disjoint ranges, equivalent to applying
    /// [`TimeRange::subtract`] pairwise to a fixed point.
    pub fn subtract_all(&self, others: &[TimeRange]) -> Vec<TimeRange> {
        let mut covered: Vec<TimeRange> = others
            .iter()
            .filter_map(|other| self.intersection(other))
            .collect();
        covered.sort_by_key(|range| range.start);

        let mut merged: Vec<TimeRange> = Vec::with_capacity(covered.len());
        for span in covered {
            match merged.last_mut() {
                Some(last) if last.overlap_with(&span) || last.adjacent_to(&span) => {
                    *last = last.hull(&span);
                }
                _ => merged.push(span),
            }
        }

        let mut remainders = Vec::new();
        let mut cursor = self.start;
        for span in merged {
            if span.start > cursor {
                remainders.push(Self {
                    start: cursor,
                    end: span.start.prev(),
                });
            }
            if span.end >= self.end {
                return remainders;
            }
            cursor = span.end.next();
        }
        remainders.push(Self {
            start: cursor,
            end: self.end,
        });
        remainders
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
