//! Bitemporal value-history engine
//!
//! Records, for one tracked property of an entity, both when a fact was
//! true in the real world (valid time, "effectivity") and when the system
//! learned or corrected it (transaction time, "settlement"). Two questions
//! become answerable: "what was true on date X" and "what did we believe
//! was true on date X, given what we knew at time Y".
//!
//! # Architecture
//!
//! ```text
//! TimePoint → TimeRange → HistoryEntry → History ──┬→ fetch(at, as-of)
//!                                                  └→ Perspective (compacted timeline)
//! ```
//!
//! Writers append facts or retractions to a [`History`]; readers query it
//! point-in-time or materialize a [`Perspective`], the non-overlapping,
//! compacted timeline of best-known values as of a settlement cutoff.
//! Conflicts resolve deterministically: per point in valid time, the most
//! recently settled entry wins.
//!
//! # Example
//!
//! ```rust
//! use bitempo::{History, TimePoint, TimeRange};
//!
//! let t0 = TimePoint::now();
//! let mut owner: History<&str> = History::new("device-42/owner");
//!
//! owner.record_at("alice", TimeRange::since(t0), t0).unwrap();
//! // a correction settled within the same second: bob took over two days in
//! owner.record_at("bob", TimeRange::since(t0.add_days(2)), t0).unwrap();
//!
//! assert_eq!(owner.fetch_as_of(t0, t0).unwrap(), &"alice");
//! assert_eq!(owner.fetch_as_of(t0.add_days(3), t0).unwrap(), &"bob");
//!
//! let timeline = owner.get_perspective(t0).unwrap();
//! assert_eq!(timeline.len(), 2);
//! ```

pub mod domain;
pub mod errors;
pub mod history;
pub mod lock;
pub mod persistence;
pub mod perspective;

// Re-export commonly used types
pub use domain::{Effective, TimePoint, TimeRange};
pub use errors::{TemporalError, TemporalResult};
pub use history::{History, HistoryEntry, Payload, RecordHook};
pub use lock::{EntityLock, KeyGuard, LockRegistry};
pub use perspective::{Perspective, PerspectiveEntry};
