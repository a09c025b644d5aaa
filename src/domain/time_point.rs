// Copyright (c) 2025 - Cowboy AI, Inc.
//! Second-Granularity Time Point with Unbounded Sentinels

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A discrete instant at whole-second granularity
///
/// Every construction path truncates sub-second precision, so two points
/// built from instants within the same second compare equal. One second is
/// the unit of adjacency and gap computation for the interval algebra.
///
/// The process-wide [`TimePoint::min`] and [`TimePoint::max`] sentinels
/// stand for "unbounded past" and "unbounded future". They are ordinary
/// values: equality is by the wrapped instant, never by identity.
///
/// # Examples
///
/// ```rust
/// use bitempo::domain::TimePoint;
///
/// let now = TimePoint::now();
/// assert!(TimePoint::min() < now);
/// assert!(now < TimePoint::max());
/// assert_eq!(now.next().prev(), now);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(DateTime<Utc>);

impl TimePoint {
    /// Create a time point, truncating to whole seconds
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant.with_nanosecond(0).unwrap_or(instant))
    }

    /// Midnight (00:00:00 UTC) of the given calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// The current instant, truncated to whole seconds
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// The unbounded-past sentinel
    pub fn min() -> Self {
        static MIN: OnceLock<TimePoint> = OnceLock::new();
        *MIN.get_or_init(|| Self(DateTime::<Utc>::MIN_UTC))
    }

    /// The unbounded-future sentinel
    pub fn max() -> Self {
        static MAX: OnceLock<TimePoint> = OnceLock::new();
        *MAX.get_or_init(|| Self::new(DateTime::<Utc>::MAX_UTC))
    }

    /// Whether this is the unbounded-past sentinel
    pub fn is_min(&self) -> bool {
        *self == Self::min()
    }

    /// Whether this is the unbounded-future sentinel
    pub fn is_max(&self) -> bool {
        *self == Self::max()
    }

    /// The point exactly one second later
    ///
    /// Saturates at [`TimePoint::max`]: there is no point past the
    /// unbounded-future sentinel. Interval arithmetic guards with
    /// comparisons before stepping, so saturation is never observable
    /// in range results.
    pub fn next(&self) -> Self {
        if self.is_max() {
            *self
        } else {
            Self(self.0 + Duration::seconds(1))
        }
    }

    /// The point exactly one second earlier
    ///
    /// Saturates at [`TimePoint::min`].
    pub fn prev(&self) -> Self {
        if self.is_min() {
            *self
        } else {
            Self(self.0 - Duration::seconds(1))
        }
    }

    /// The point a whole number of days away; sentinels are fixed points
    pub fn add_days(&self, days: i64) -> Self {
        if self.is_min() || self.is_max() {
            return *self;
        }
        match self.0.checked_add_signed(Duration::days(days)) {
            Some(instant) => Self::new(instant),
            None if days < 0 => Self::min(),
            None => Self::max(),
        }
    }

    /// The wrapped instant
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_min() {
            write!(f, "-unbounded")
        } else if self.is_max() {
            write!(f, "+unbounded")
        } else {
            write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
        }
    }
}

impl From<DateTime<Utc>> for TimePoint {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl From<NaiveDate> for TimePoint {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}
