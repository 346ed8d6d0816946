//! Row validation: raw CSV rows into typed trip records.
//!
//! Validation never aborts on the first bad row. Each input row either
//! becomes a [`TripRecord`] or lands in the rejected list with a reason
//! code. A malformed timestamp is the one non-fatal case: the field is
//! treated as absent, the row stays in the batch (its boardings still
//! count), and the failure is recorded as a separate timing flag.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::{RejectReason, RejectedRow};

/// One CSV row as parsed: header name to raw string value.
pub type RawRow = HashMap<String, String>;

/// Service classification carried through from the input. Unknown values
/// are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceType {
    Local,
    Express,
    Pulse,
    Regional,
    Other(String),
}

impl ServiceType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => ServiceType::Local,
            "express" => ServiceType::Express,
            "pulse" => ServiceType::Pulse,
            "regional" => ServiceType::Regional,
            _ => ServiceType::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::Local => "Local",
            ServiceType::Express => "Express",
            ServiceType::Pulse => "Pulse",
            ServiceType::Regional => "Regional",
            ServiceType::Other(s) => s,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A validated trip-level record.
///
/// `actual_departure` is `None` for cancelled trips (scheduled time present,
/// no actual time) and for rows whose actual timestamp failed to parse; the
/// two cases are distinguished by the timing flags on the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub route_id: String,
    pub route_name: String,
    pub service_type: ServiceType,
    pub scheduled_departure: Option<NaiveDateTime>,
    pub actual_departure: Option<NaiveDateTime>,
    pub boardings: u64,
    pub trip_date: NaiveDate,
    /// Supplied per-trip revenue hours, when the input carries the optional
    /// `revenue_hours` column. Derived from scheduled spans otherwise.
    pub revenue_hours: Option<f64>,
}

/// Result of normalizing a batch of raw rows.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<TripRecord>,
    pub rejected: Vec<RejectedRow>,
    /// Rows kept in `records` but excluded from timing aggregates because a
    /// non-empty timestamp field failed to parse.
    pub timing_flags: Vec<RejectedRow>,
}

fn field<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.get(key).map(|v| v.trim()).unwrap_or("")
}

/// Parses a timestamp in RFC 3339 / ISO-8601, with documented fallbacks for
/// the space-separated and minute-precision forms.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    None
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Returns `(value, invalid)`: an empty field is absent, a non-empty field
/// that fails to parse is absent and flagged invalid.
fn timestamp_field(row: &RawRow, key: &str) -> (Option<NaiveDateTime>, bool) {
    let raw = field(row, key);
    if raw.is_empty() {
        return (None, false);
    }
    match parse_timestamp(raw) {
        Some(ts) => (Some(ts), false),
        None => (None, true),
    }
}

/// Validates raw rows into [`TripRecord`]s. Pure function of its input: bad
/// rows are collected, never raised.
pub fn normalize_rows<I>(rows: I) -> NormalizedBatch
where
    I: IntoIterator<Item = RawRow>,
{
    let mut batch = NormalizedBatch::default();

    for (idx, row) in rows.into_iter().enumerate() {
        let row_no = idx + 1;

        let route_id = field(&row, "route_id");
        if route_id.is_empty() {
            batch
                .rejected
                .push(RejectedRow::new(row_no, RejectReason::MissingField, "route_id"));
            continue;
        }

        let route_name = field(&row, "route_name");
        if route_name.is_empty() {
            batch
                .rejected
                .push(RejectedRow::new(row_no, RejectReason::MissingField, "route_name"));
            continue;
        }

        let boardings_raw = field(&row, "boardings");
        let boardings: u64 = match boardings_raw.parse() {
            Ok(b) => b,
            Err(_) => {
                batch.rejected.push(RejectedRow::new(
                    row_no,
                    RejectReason::InvalidNumber,
                    format!("boardings '{boardings_raw}'"),
                ));
                continue;
            }
        };

        let date_raw = field(&row, "trip_date");
        let trip_date = match parse_date(date_raw) {
            Some(d) => d,
            None => {
                batch.rejected.push(RejectedRow::new(
                    row_no,
                    RejectReason::InvalidDate,
                    format!("trip_date '{date_raw}'"),
                ));
                continue;
            }
        };

        let (scheduled_departure, scheduled_bad) = timestamp_field(&row, "scheduled_departure");
        if scheduled_bad {
            batch.timing_flags.push(RejectedRow::new(
                row_no,
                RejectReason::InvalidTimestamp,
                format!("scheduled_departure '{}'", field(&row, "scheduled_departure")),
            ));
        }

        let (actual_departure, actual_bad) = timestamp_field(&row, "actual_departure");
        if actual_bad {
            batch.timing_flags.push(RejectedRow::new(
                row_no,
                RejectReason::InvalidTimestamp,
                format!("actual_departure '{}'", field(&row, "actual_departure")),
            ));
        }

        // A flagged actual time must not read as a cancellation.
        let scheduled_departure = if actual_bad { None } else { scheduled_departure };

        let revenue_hours = field(&row, "revenue_hours")
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h > 0.0);

        batch.records.push(TripRecord {
            route_id: route_id.to_string(),
            route_name: route_name.to_string(),
            service_type: ServiceType::parse(field(&row, "service_type")),
            scheduled_departure,
            actual_departure,
            boardings,
            trip_date,
            revenue_hours,
        });
    }

    batch
}
