//! Per-employee, per-day attendance computation.
//!
//! Raw punches go through [`normalizer`] (strict IN/OUT alternation),
//! [`periods`] (IN/OUT pairs, trailing IN auto-closed) and [`metrics`]
//! (window overlaps and status). Direction changes are written back through
//! [`correction`] before the day summary is stored.

pub mod correction;
pub mod metrics;
pub mod normalizer;
pub mod periods;
pub mod service;

pub use service::{
    affected_days, calculate_attendance, calculate_for_date, parse_work_date, recalculate_days,
};
