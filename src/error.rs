//! Error taxonomy for the report pipeline.
//!
//! Per-row validation failures are collected as [`RejectedRow`] values and
//! returned alongside the report; they never abort a run. Whole-run failures
//! are [`RunError`] and abort before any aggregate is produced.

use serde::Serialize;
use std::fmt;

/// Reason code attached to a rejected or flagged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingField,
    InvalidNumber,
    InvalidTimestamp,
    InvalidDate,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::MissingField => "missing_field",
            RejectReason::InvalidNumber => "invalid_number",
            RejectReason::InvalidTimestamp => "invalid_timestamp",
            RejectReason::InvalidDate => "invalid_date",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single input row that failed validation, with its 1-based data row
/// number and the offending field/value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: RejectReason,
    pub detail: String,
}

impl RejectedRow {
    pub fn new(row: usize, reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            row,
            reason,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {} ({})", self.row, self.reason, self.detail)
    }
}

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no valid trip records after normalization")]
    EmptyInput,
    #[error("input exceeds the configured {what} limit: {actual} > {limit}")]
    OversizedInput {
        what: &'static str,
        limit: u64,
        actual: u64,
    },
}
