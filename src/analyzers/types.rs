//! Data types produced by the report pipeline.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use serde::Serialize;
use std::fmt;

use crate::normalize::ServiceType;

/// Per-route statistics from a single aggregation pass.
///
/// Classification counts cover trips with usable timing data only:
/// `on_time_count + minor_delay_count + major_delay_count + cancelled_count`
/// equals `timed_trip_count`, never `trip_count` (boarding-only rows carry
/// no timing). Percentages are stored at full precision; rounding happens
/// only at display time.
#[derive(Debug, Clone, Serialize)]
pub struct RouteAggregate {
    pub route_id: String,
    pub route_name: String,
    pub service_type: ServiceType,
    pub trip_count: usize,
    pub timed_trip_count: usize,
    pub on_time_count: usize,
    pub minor_delay_count: usize,
    pub major_delay_count: usize,
    pub cancelled_count: usize,
    pub total_boardings: u64,
    /// Supplied via the input when present, otherwise derived from the
    /// scheduled span of the route's trips. `None` when neither works.
    pub revenue_hours: Option<f64>,
    pub boardings_per_trip: f64,
    /// `None` rather than zero when revenue hours could not be determined.
    pub boardings_per_hour: Option<f64>,
    /// `None` when the route has no trips with timing data.
    pub on_time_pct: Option<f64>,
    pub mean_delay_min: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// System-wide statistics across all valid records.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSummary {
    pub total_records: usize,
    pub unique_route_count: usize,
    pub total_boardings: u64,
    pub date_range: DateRange,
    /// Trip-count-weighted mean of per-route on-time ratios, not a simple
    /// average of percentages. `None` when no route has timing data.
    pub system_on_time_pct: Option<f64>,
    /// Pearson correlation between total boardings and mean delay across
    /// routes with delay data. `None` with fewer than two such routes.
    pub delay_boarding_correlation: Option<f64>,
}

/// Service period buckets for peak against off-peak comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimePeriod {
    #[serde(rename = "Weekday AM Peak")]
    WeekdayAmPeak,
    #[serde(rename = "Weekday PM Peak")]
    WeekdayPmPeak,
    #[serde(rename = "Weekday Off-Peak")]
    WeekdayOffPeak,
    #[serde(rename = "Weekend All Day")]
    Weekend,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::WeekdayAmPeak,
        TimePeriod::WeekdayPmPeak,
        TimePeriod::WeekdayOffPeak,
        TimePeriod::Weekend,
    ];

    /// Buckets a trip by calendar day and scheduled hour. Weekday peaks are
    /// 06:00-09:00 and 15:00-19:00; weekends are a single bucket. A weekday
    /// trip without a scheduled time cannot be placed.
    pub fn classify(trip_date: NaiveDate, scheduled: Option<NaiveDateTime>) -> Option<Self> {
        if matches!(trip_date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Some(TimePeriod::Weekend);
        }
        let period = match scheduled?.hour() {
            6..=8 => TimePeriod::WeekdayAmPeak,
            15..=18 => TimePeriod::WeekdayPmPeak,
            _ => TimePeriod::WeekdayOffPeak,
        };
        Some(period)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            TimePeriod::WeekdayAmPeak => 0,
            TimePeriod::WeekdayPmPeak => 1,
            TimePeriod::WeekdayOffPeak => 2,
            TimePeriod::Weekend => 3,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimePeriod::WeekdayAmPeak => "Weekday AM Peak",
            TimePeriod::WeekdayPmPeak => "Weekday PM Peak",
            TimePeriod::WeekdayOffPeak => "Weekday Off-Peak",
            TimePeriod::Weekend => "Weekend All Day",
        };
        f.write_str(s)
    }
}

/// Boardings by service period. Periods with no placeable trips are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub period: TimePeriod,
    pub trip_count: usize,
    pub total_boardings: u64,
    pub boardings_per_trip: f64,
}

/// Route-level productivity rolled up by service type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTypeAggregate {
    pub service_type: ServiceType,
    pub route_count: usize,
    pub total_boardings: u64,
    /// Mean of the per-route rates; `None` when no route in the group has a
    /// defined rate.
    pub avg_boardings_per_hour: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardingsRank {
    pub route_id: String,
    pub route_name: String,
    pub total_boardings: u64,
    pub boardings_per_trip: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityRank {
    pub route_id: String,
    pub route_name: String,
    pub boardings_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityRank {
    pub route_id: String,
    pub route_name: String,
    pub on_time_pct: f64,
    pub trip_count: usize,
}

/// Ordered views derived from the aggregates. A pure projection: the full
/// aggregate list keeps its input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedViews {
    pub top_boardings: Vec<BoardingsRank>,
    pub bottom_productivity: Vec<ProductivityRank>,
    pub highest_reliability: Vec<ReliabilityRank>,
    pub lowest_reliability: Vec<ReliabilityRank>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "Operational Short-Term")]
    OperationalShortTerm,
    #[serde(rename = "Mid-Term Planning")]
    MidTermPlanning,
    #[serde(rename = "Regional Integration")]
    RegionalIntegration,
    #[serde(rename = "Technology & Innovation")]
    TechnologyInnovation,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::OperationalShortTerm => "Operational Short-Term",
            Category::MidTermPlanning => "Mid-Term Planning",
            Category::RegionalIntegration => "Regional Integration",
            Category::TechnologyInnovation => "Technology & Innovation",
        };
        f.write_str(s)
    }
}

/// One fired recommendation rule.
///
/// `estimated_impact`, `estimated_cost` and `implementation_timeline` come
/// from a static per-rule lookup; they are indicative planning bands, never
/// computed from the data.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub rule_id: &'static str,
    pub priority: Priority,
    pub category: Category,
    /// Triggering route, absent for system-wide rules.
    pub route_id: Option<String>,
    pub route_name: Option<String>,
    pub action: String,
    pub rationale: String,
    pub estimated_impact: &'static str,
    pub estimated_cost: &'static str,
    pub implementation_timeline: &'static str,
}

/// The complete report artifact, the sole output of a run. Immutable once
/// produced; routes keep input insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub summary: SystemSummary,
    pub routes: Vec<RouteAggregate>,
    pub period_comparison: Vec<PeriodAggregate>,
    pub service_type_productivity: Vec<ServiceTypeAggregate>,
    pub rankings: RankedViews,
    pub recommendations: Vec<Recommendation>,
}
