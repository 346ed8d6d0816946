//! Report pipeline: aggregation, ranking, and recommendation synthesis.
//!
//! Normalized trip records are folded into per-route and system-wide
//! statistics, projected into ordered ranking views, and run through a
//! fixed rule set to produce prioritized recommendations. Control flow is
//! strictly linear; no stage reaches back into an earlier one.

pub mod aggregate;
pub mod rank;
pub mod recommend;
pub mod report;
pub mod types;
pub mod utility;
