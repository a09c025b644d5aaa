//! Property-Based Tests for History Projection
//!
//! The perspective is a pure function of the log and the settlement cutoff.
//! For every point in valid time it must agree with `fetch`, and its output
//! must be the canonical minimal form: sorted, disjoint, compacted.

use bitempo::{Effective, History, TimePoint, TimeRange};
use proptest::prelude::*;

use super::{time_point, time_range};

#[derive(Debug, Clone)]
enum Op {
    Record(u8, TimeRange),
    Forget(TimeRange),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        // few distinct values so equal-valued adjacency actually occurs
        (0..4u8, time_range()).prop_map(|(value, range)| Op::Record(value, range)),
        time_range().prop_map(Op::Forget),
    ]
}

fn build_history(ops: &[Op]) -> History<u8> {
    let mut history = History::new("prop/entity");
    let mut settled = TimePoint::min().next();
    for operation in ops {
        match operation {
            Op::Record(value, range) => history.record_at(*value, *range, settled),
            Op::Forget(range) => history.forget_at(*range, settled),
        }
        .expect("monotonic settlements always append");
        settled = settled.next();
    }
    history
}

proptest! {
    /// The perspective agrees with fetch at every probed instant: same
    /// value where one is known, a hole exactly where fetch misses.
    #[test]
    fn prop_perspective_agrees_with_fetch(
        ops in prop::collection::vec(op(), 0..12),
        probes in prop::collection::vec(time_point(), 1..20),
    ) {
        let history = build_history(&ops);
        let cutoff = TimePoint::max();
        let perspective = history.get_perspective(cutoff).unwrap();

        for probe in probes {
            let fetched = history.fetch_as_of(probe, cutoff);
            let projected = perspective.fetch(probe);
            prop_assert_eq!(fetched.ok(), projected.ok());
        }
    }

    /// Perspective output is canonical: start-sorted, pairwise disjoint,
    /// and at the compaction fixed point (no adjacent equal values).
    #[test]
    fn prop_perspective_is_canonical(ops in prop::collection::vec(op(), 0..12)) {
        let history = build_history(&ops);
        let perspective = history.get_perspective(TimePoint::max()).unwrap();

        for pair in perspective.entries().windows(2) {
            prop_assert!(pair[0].effectivity().end() < pair[1].effectivity().start());
            let mergeable =
                pair[0].adjacent_to(&pair[1]) && pair[0].value() == pair[1].value();
            prop_assert!(!mergeable);
        }
    }

    /// Rebuilding from the materialized entries yields the same perspective
    /// (projection is already compacted, so construction is a fixed point).
    #[test]
    fn prop_projection_is_compaction_fixed_point(ops in prop::collection::vec(op(), 0..12)) {
        let history = build_history(&ops);
        let perspective = history.get_perspective(TimePoint::max()).unwrap();
        let rebuilt = bitempo::Perspective::new(
            perspective.settled_at(),
            perspective.entries().to_vec(),
        ).unwrap();
        prop_assert_eq!(rebuilt.entries(), perspective.entries());
    }

    /// An earlier cutoff never reflects later settlements: the perspective
    /// as of cutoff K equals the perspective of the truncated log.
    #[test]
    fn prop_cutoff_equals_truncated_log(
        ops in prop::collection::vec(op(), 1..12),
        keep in 0..12usize,
    ) {
        let history = build_history(&ops);
        let keep = keep.min(history.len());
        let cutoff = match keep {
            0 => TimePoint::min(),
            n => history.entries()[n - 1].settled_at(),
        };

        let truncated = History::with_entries(
            "prop/entity",
            history.entries()[..keep].to_vec(),
        ).unwrap();

        let full_view = history.get_perspective(cutoff).unwrap();
        let truncated_view = truncated.get_perspective(cutoff).unwrap();
        prop_assert_eq!(full_view.entries(), truncated_view.entries());
    }
}
