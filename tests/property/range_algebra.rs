//! Property-Based Tests for the Interval Algebra
//!
//! Laws from the engine's contract: containment of endpoints, adjacency as
//! the one-second step, and the subtraction partition law - the remainders
//! plus the subtracted coverage reconstitute the original range exactly.

use bitempo::{TimePoint, TimeRange};
use proptest::prelude::*;

use super::{maybe_unbounded_range, time_point, time_range};

/// Naive fixpoint strategy from the contract: repeatedly apply pairwise
/// subtraction until nothing splits anymore. The sweep in
/// [`TimeRange::subtract_all`] must be observably equivalent.
fn subtract_all_fixpoint(range: TimeRange, others: &[TimeRange]) -> Vec<TimeRange> {
    let mut remainders = vec![range];
    loop {
        let split: Vec<TimeRange> = remainders
            .iter()
            .flat_map(|remainder| {
                let mut pieces = vec![*remainder];
                for other in others {
                    pieces = pieces
                        .iter()
                        .flat_map(|piece| piece.subtract(other))
                        .collect();
                }
                pieces
            })
            .collect();
        if split == remainders {
            let mut sorted = split;
            sorted.sort_by_key(|r| r.start());
            return sorted;
        }
        remainders = split;
    }
}

proptest! {
    /// A range contains both of its endpoints.
    #[test]
    fn prop_contains_endpoints(range in maybe_unbounded_range()) {
        prop_assert!(range.contains(range.start()));
        prop_assert!(range.contains(range.end()));
    }

    /// Construction fails exactly when the bounds are inverted.
    #[test]
    fn prop_construction_validates_bounds(a in time_point(), b in time_point()) {
        let result = TimeRange::new(a, b);
        prop_assert_eq!(result.is_ok(), a <= b);
    }

    /// Disjoint ranges are adjacent iff the one-second step from one end
    /// reaches the other start; adjacency is symmetric.
    #[test]
    fn prop_adjacency_is_the_one_second_step(a in time_range(), b in time_range()) {
        prop_assert_eq!(a.adjacent_to(&b), b.adjacent_to(&a));
        if !a.overlap_with(&b) {
            let expected = a.end().next() == b.start() || b.end().next() == a.start();
            prop_assert_eq!(a.adjacent_to(&b), expected);
        } else {
            prop_assert!(!a.adjacent_to(&b));
        }
    }

    /// Intersection is defined exactly for overlapping ranges and is
    /// contained in both operands.
    #[test]
    fn prop_intersection_within_both(a in time_range(), b in time_range()) {
        match a.intersection(&b) {
            Some(shared) => {
                prop_assert!(a.overlap_with(&b));
                prop_assert!(shared.included_in(&a));
                prop_assert!(shared.included_in(&b));
            }
            None => prop_assert!(!a.overlap_with(&b)),
        }
    }

    /// Union covers both operands and nothing outside their hull.
    #[test]
    fn prop_union_covers_both(a in time_range(), b in time_range()) {
        if let Some(combined) = a.union(&b) {
            prop_assert!(a.included_in(&combined));
            prop_assert!(b.included_in(&combined));
            prop_assert!(combined.start() == a.start().min(b.start()));
            prop_assert!(combined.end() == a.end().max(b.end()));
        }
    }

    /// Pairwise subtraction yields at most two remainders, all inside self
    /// and disjoint from the subtrahend.
    #[test]
    fn prop_subtract_remainders_disjoint_from_other(a in time_range(), b in time_range()) {
        let remainders = a.subtract(&b);
        prop_assert!(remainders.len() <= 2);
        for remainder in &remainders {
            prop_assert!(remainder.included_in(&a));
            prop_assert!(!remainder.overlap_with(&b));
        }
    }

    /// Point-wise partition law: every point of self is either covered by
    /// some subtrahend or inside exactly one remainder, never both.
    #[test]
    fn prop_subtract_all_partitions_self(
        a in maybe_unbounded_range(),
        others in prop::collection::vec(time_range(), 0..6),
        probe in time_point(),
    ) {
        let remainders = a.subtract_all(&others);
        if a.contains(probe) {
            let covered = others.iter().any(|other| other.contains(probe));
            let remaining = remainders.iter().filter(|r| r.contains(probe)).count();
            prop_assert_eq!(remaining, usize::from(!covered));
        } else {
            prop_assert!(!remainders.iter().any(|r| r.contains(probe)));
        }
    }

    /// Remainders come out sorted, disjoint, and non-adjacent (maximal runs).
    #[test]
    fn prop_subtract_all_yields_maximal_disjoint_runs(
        a in maybe_unbounded_range(),
        others in prop::collection::vec(time_range(), 0..6),
    ) {
        let remainders = a.subtract_all(&others);
        for pair in remainders.windows(2) {
            prop_assert!(pair[0].end() < pair[1].start());
            prop_assert!(!pair[0].adjacent_to(&pair[1]));
        }
        for remainder in &remainders {
            prop_assert!(remainder.included_in(&a));
        }
    }

    /// Subtracting the same set twice changes nothing.
    #[test]
    fn prop_subtract_all_idempotent(
        a in maybe_unbounded_range(),
        others in prop::collection::vec(time_range(), 0..6),
    ) {
        let once = a.subtract_all(&others);
        let twice: Vec<TimeRange> = once
            .iter()
            .flat_map(|remainder| remainder.subtract_all(&others))
            .collect();
        prop_assert_eq!(once, twice);
    }

    /// The sweep agrees with the naive pairwise-fixpoint strategy.
    #[test]
    fn prop_sweep_equals_pairwise_fixpoint(
        a in time_range(),
        others in prop::collection::vec(time_range(), 0..5),
    ) {
        prop_assert_eq!(a.subtract_all(&others), subtract_all_fixpoint(a, &others));
    }

    /// Sentinel safety: subtracting from the unbounded range never steps
    /// past MIN or MAX, and the edges stay unbounded when uncovered.
    #[test]
    fn prop_unbounded_subtraction_keeps_sentinel_edges(
        others in prop::collection::vec(time_range(), 1..6),
    ) {
        let remainders = TimeRange::unbounded().subtract_all(&others);
        // concrete subtrahends can never cover the sentinels
        prop_assert!(remainders.first().map(|r| r.start().is_min()).unwrap_or(false));
        prop_assert!(remainders.last().map(|r| r.end().is_max()).unwrap_or(false));
        prop_assert!(!remainders.iter().any(|r| others.iter().any(|o| r.overlap_with(o))));
    }

    /// next/prev are inverses away from the sentinels.
    #[test]
    fn prop_step_round_trips(point in time_point()) {
        prop_assert_eq!(point.next().prev(), point);
        prop_assert_eq!(point.prev().next(), point);
        prop_assert!(point.next() > point);
    }

}

/// Sentinels saturate instead of overflowing.
#[test]
fn sentinels_saturate() {
    assert_eq!(TimePoint::max().next(), TimePoint::max());
    assert_eq!(TimePoint::min().prev(), TimePoint::min());
}
