use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Tunable thresholds for classification, ranking, and recommendations.
///
/// Loaded from a plain JSON object on disk; any omitted field keeps its
/// default:
/// ```json
/// {
///   "minor_delay_cutoff_min": 3.0,
///   "top_boardings_n": 10
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Maximum departure delay in minutes still counted as on-time.
    /// Early departures always count as on-time.
    pub on_time_tolerance_min: f64,
    /// Delays above the tolerance but at or below this cutoff are minor;
    /// beyond it they are major.
    pub minor_delay_cutoff_min: f64,

    /// Number of routes in the top-boardings ranking.
    pub top_boardings_n: usize,
    /// Number of routes in each of the reliability extremes.
    pub reliability_n: usize,
    /// Number of routes in the bottom-productivity ranking.
    pub bottom_productivity_n: usize,
    /// Routes with fewer trips than this are omitted from the reliability
    /// rankings.
    pub min_reliability_sample: usize,

    /// Boardings per trip above which a top-boardings route is considered
    /// capacity-constrained.
    pub capacity_threshold: f64,
    /// On-time percentage below which a low-reliability route qualifies for
    /// transit priority measures.
    pub reliability_floor_pct: f64,
    /// Boardings per revenue hour below which a route qualifies for schedule
    /// adjustment.
    pub productivity_floor: f64,
    /// Morning-peak boardings above which coordination with regional
    /// services is recommended.
    pub peak_demand_threshold: u64,

    /// Maximum number of input rows accepted per run.
    pub max_rows: usize,
    /// Maximum input size in bytes, applied before parsing.
    pub max_bytes: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            on_time_tolerance_min: 0.0,
            minor_delay_cutoff_min: 5.0,
            top_boardings_n: 5,
            reliability_n: 3,
            bottom_productivity_n: 10,
            min_reliability_sample: 5,
            capacity_threshold: 40.0,
            reliability_floor_pct: 75.0,
            productivity_floor: 10.0,
            peak_demand_threshold: 50_000,
            max_rows: 250_000,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
