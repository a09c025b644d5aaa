//! Property test modules

pub mod projection;
pub mod range_algebra;

use bitempo::{TimePoint, TimeRange};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

/// A window of a few days in 2024; one-second granularity makes adjacency
/// and gap properties exercise realistic boundaries.
const WINDOW_SECONDS: i64 = 5 * 24 * 60 * 60;

/// An arbitrary concrete (non-sentinel) point inside the test window
pub fn time_point() -> impl Strategy<Value = TimePoint> {
    (0..WINDOW_SECONDS).prop_map(|offset| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimePoint::new(base + Duration::seconds(offset))
    })
}

/// An arbitrary valid range inside the test window
pub fn time_range() -> impl Strategy<Value = TimeRange> {
    (time_point(), time_point()).prop_map(|(a, b)| {
        TimeRange::new(a.min(b), a.max(b)).expect("ordered bounds are always valid")
    })
}

/// A range that may be unbounded on either side
pub fn maybe_unbounded_range() -> impl Strategy<Value = TimeRange> {
    (time_range(), 0..4u8).prop_map(|(range, variant)| match variant {
        1 => TimeRange::since(range.start()),
        2 => TimeRange::until(range.end()),
        3 => TimeRange::unbounded(),
        _ => range,
    })
}
