// Copyright (c) 2025 - Cowboy AI, Inc.
//! Effective Trait for Anything with a Validity Range
//!
//! Any type carrying an effectivity range gets containment, overlap, and
//! adjacency behavior through a single accessor, so the interval logic
//! lives in one place instead of being duplicated per entity kind.

use crate::domain::{TimePoint, TimeRange};

/// Something that is effective over a valid-time range
pub trait Effective {
    /// The valid-time range this object covers
    fn effectivity(&self) -> &TimeRange;

    /// Whether this object is effective at the given instant
    fn is_effective_on(&self, at: TimePoint) -> bool {
        self.effectivity().contains(at)
    }

    /// Whether the two effectivity ranges share at least one point
    fn overlap_with<E: Effective + ?Sized>(&self, other: &E) -> bool {
        self.effectivity().overlap_with(other.effectivity())
    }

    /// Whether the two effectivity ranges are disjoint and one second apart
    fn adjacent_to<E: Effective + ?Sized>(&self, other: &E) -> bool {
        self.effectivity().adjacent_to(other.effectivity())
    }

    /// Whether this object's range entirely covers the other's
    fn encloses<E: Effective + ?Sized>(&self, other: &E) -> bool {
        other.effectivity().included_in(self.effectivity())
    }
}

impl Effective for TimeRange {
    fn effectivity(&self) -> &TimeRange {
        self
    }
}
