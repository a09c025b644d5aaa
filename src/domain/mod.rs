// Copyright (c) 2025 - Cowboy AI, Inc.
//! Temporal Domain Values
//!
//! Core value objects for the bitemporal engine, all immutable and safe to
//! share across readers:
//!
//! - [`TimePoint`] - second-granularity instant with MIN/MAX sentinels
//! - [`TimeRange`] - closed interval with set algebra (overlap, adjacency,
//!   intersection, union, subtraction)
//! - [`Effective`] - trait lending the interval operations to anything that
//!   exposes an effectivity range

pub mod effective;
pub mod time_point;
pub mod time_range;

pub use effective::Effective;
pub use time_point::TimePoint;
pub use time_range::TimeRange;
