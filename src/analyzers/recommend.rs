//! Rule-based recommendation synthesis.
//!
//! Each rule inspects the summary, the ranked views and the period
//! comparison and fires independently per qualifying route. Rationale text is built from fixed templates with
//! the triggering aggregate's actual numbers interpolated; impact, cost and
//! timeline come from [`RULE_ESTIMATES`] and are indicative planning bands,
//! not derived from the data.

use crate::analyzers::types::{
    Category, PeriodAggregate, Priority, RankedViews, Recommendation, SystemSummary, TimePeriod,
};
use crate::config::ReportConfig;

/// On-time percentage regarded as the industry reliability standard.
const SYSTEM_RELIABILITY_STANDARD_PCT: f64 = 85.0;
/// Baseline reliability above which forecasting investment is worth raising.
const FORECAST_BASELINE_PCT: f64 = 80.0;

struct RuleEstimate {
    impact: &'static str,
    cost: &'static str,
    timeline: &'static str,
}

/// Static planning-level estimates per rule id.
static RULE_ESTIMATES: &[(&str, RuleEstimate)] = &[
    (
        "high-boardings-per-trip",
        RuleEstimate {
            impact: "12-15% ridership increase, reduced overcrowding",
            cost: "$80K - $120K annually (additional driver hours)",
            timeline: "2-3 months",
        },
    ),
    (
        "low-reliability",
        RuleEstimate {
            impact: "20-25% improvement in reliability, increased ridership retention",
            cost: "$250K - $500K per corridor",
            timeline: "12-18 months",
        },
    ),
    (
        "low-productivity",
        RuleEstimate {
            impact: "8-10% operating cost savings on the affected route",
            cost: "$40K - $60K schedule revision and runtime analysis",
            timeline: "6-12 months",
        },
    ),
    (
        "peak-demand-integration",
        RuleEstimate {
            impact: "15-20% improvement in regional connectivity, reduced service duplication",
            cost: "$40K schedule coordination analysis",
            timeline: "4-6 months",
        },
    ),
    (
        "reliability-program",
        RuleEstimate {
            impact: "8-12% improvement in on-time performance within 12 months",
            cost: "$90K program management and training",
            timeline: "3-6 months to launch, ongoing",
        },
    ),
    (
        "demand-forecasting",
        RuleEstimate {
            impact: "5-8% efficiency improvement, better resource utilization",
            cost: "$120K - $180K (predictive analytics platform)",
            timeline: "8-12 months",
        },
    ),
];

fn estimate(rule_id: &str) -> &'static RuleEstimate {
    // Every rule below has a table entry; the fallback keeps the lookup total.
    static UNKNOWN: RuleEstimate = RuleEstimate {
        impact: "not estimated",
        cost: "not estimated",
        timeline: "not estimated",
    };
    RULE_ESTIMATES
        .iter()
        .find(|(id, _)| *id == rule_id)
        .map(|(_, est)| est)
        .unwrap_or(&UNKNOWN)
}

fn rule(
    rule_id: &'static str,
    priority: Priority,
    category: Category,
    route: Option<(&str, &str)>,
    action: String,
    rationale: String,
) -> Recommendation {
    let est = estimate(rule_id);
    Recommendation {
        rule_id,
        priority,
        category,
        route_id: route.map(|(id, _)| id.to_string()),
        route_name: route.map(|(_, name)| name.to_string()),
        action,
        rationale,
        estimated_impact: est.impact,
        estimated_cost: est.cost,
        implementation_timeline: est.timeline,
    }
}

/// Applies the ordered rule set. Output is sorted High before Medium before
/// Low; the sort is stable, so rules keep their declaration order within a
/// priority.
pub fn synthesize(
    summary: &SystemSummary,
    views: &RankedViews,
    periods: &[PeriodAggregate],
    cfg: &ReportConfig,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    for r in &views.top_boardings {
        if r.boardings_per_trip > cfg.capacity_threshold {
            recs.push(rule(
                "high-boardings-per-trip",
                Priority::High,
                Category::OperationalShortTerm,
                Some((&r.route_id, &r.route_name)),
                format!(
                    "Increase frequency on Route {} ({}) during peak periods",
                    r.route_id, r.route_name
                ),
                format!(
                    "High average boardings ({:.1} per trip) indicates capacity \
                     constraints and potential overcrowding; higher frequency \
                     reduces wait times.",
                    r.boardings_per_trip
                ),
            ));
        }
    }

    for r in &views.lowest_reliability {
        if r.on_time_pct < cfg.reliability_floor_pct {
            recs.push(rule(
                "low-reliability",
                Priority::High,
                Category::MidTermPlanning,
                Some((&r.route_id, &r.route_name)),
                format!(
                    "Deploy transit priority measures for Route {} ({})",
                    r.route_id, r.route_name
                ),
                format!(
                    "Poor on-time performance ({:.1}%) points to congestion on the \
                     corridor; bus lanes, signal priority and queue jumps improve \
                     travel time consistency.",
                    r.on_time_pct
                ),
            ));
        }
    }

    for r in &views.bottom_productivity {
        if r.boardings_per_hour < cfg.productivity_floor {
            recs.push(rule(
                "low-productivity",
                Priority::Medium,
                Category::MidTermPlanning,
                Some((&r.route_id, &r.route_name)),
                format!(
                    "Adjust the schedule on Route {} ({}) to match observed demand",
                    r.route_id, r.route_name
                ),
                format!(
                    "Low productivity ({:.1} boardings per revenue hour) indicates \
                     service levels out of step with demand; a schedule adjustment \
                     recovers hours without dropping coverage.",
                    r.boardings_per_hour
                ),
            ));
        }
    }

    if let Some(am_peak) = periods
        .iter()
        .find(|p| p.period == TimePeriod::WeekdayAmPeak)
    {
        if am_peak.total_boardings > cfg.peak_demand_threshold {
            recs.push(rule(
                "peak-demand-integration",
                Priority::Medium,
                Category::RegionalIntegration,
                None,
                "Coordinate peak-period routes as feeders to regional rail and express services"
                    .to_string(),
                format!(
                    "High morning peak demand ({} boardings) indicates a strong \
                     commuter market; coordinating schedules with regional services \
                     avoids duplicating long-distance trips.",
                    am_peak.total_boardings
                ),
            ));
        }
    }

    if let Some(system_pct) = summary.system_on_time_pct {
        if system_pct < SYSTEM_RELIABILITY_STANDARD_PCT {
            recs.push(rule(
                "reliability-program",
                Priority::High,
                Category::OperationalShortTerm,
                None,
                "Launch a system-wide service reliability improvement program".to_string(),
                format!(
                    "System on-time performance ({system_pct:.1}%) is below the \
                     {SYSTEM_RELIABILITY_STANDARD_PCT:.0}% industry standard; operator \
                     training, schedule padding review and maintenance planning \
                     address the root causes.",
                ),
            ));
        }

        if system_pct >= FORECAST_BASELINE_PCT {
            recs.push(rule(
                "demand-forecasting",
                Priority::Low,
                Category::TechnologyInnovation,
                None,
                "Evaluate a predictive demand forecasting platform for proactive scheduling"
                    .to_string(),
                format!(
                    "Good baseline reliability ({system_pct:.1}%) provides the \
                     foundation for demand-driven planning around events, weather \
                     and holidays.",
                ),
            ));
        }
    }

    recs.sort_by_key(|r| r.priority);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{
        BoardingsRank, DateRange, ProductivityRank, ReliabilityRank,
    };
    use chrono::NaiveDate;

    fn summary(system_on_time_pct: Option<f64>) -> SystemSummary {
        SystemSummary {
            total_records: 100,
            unique_route_count: 4,
            total_boardings: 5000,
            date_range: DateRange {
                start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            },
            system_on_time_pct,
            delay_boarding_correlation: None,
        }
    }

    fn am_peak(total_boardings: u64) -> PeriodAggregate {
        PeriodAggregate {
            period: TimePeriod::WeekdayAmPeak,
            trip_count: 1200,
            total_boardings,
            boardings_per_trip: total_boardings as f64 / 1200.0,
        }
    }

    fn boardings_rank(route_id: &str, boardings_per_trip: f64) -> BoardingsRank {
        BoardingsRank {
            route_id: route_id.to_string(),
            route_name: format!("Route {route_id}"),
            total_boardings: 1000,
            boardings_per_trip,
        }
    }

    #[test]
    fn test_capacity_rule_fires_above_threshold() {
        let views = RankedViews {
            top_boardings: vec![boardings_rank("101", 45.0), boardings_rank("202", 30.0)],
            ..Default::default()
        };
        let recs = synthesize(&summary(Some(90.0)), &views, &[], &ReportConfig::default());

        let capacity: Vec<_> = recs
            .iter()
            .filter(|r| r.rule_id == "high-boardings-per-trip")
            .collect();
        assert_eq!(capacity.len(), 1);
        assert_eq!(capacity[0].route_id.as_deref(), Some("101"));
        assert_eq!(capacity[0].priority, Priority::High);
        assert_eq!(capacity[0].category, Category::OperationalShortTerm);
        assert!(capacity[0].rationale.contains("45.0 per trip"));
    }

    #[test]
    fn test_low_reliability_rule() {
        let views = RankedViews {
            lowest_reliability: vec![
                ReliabilityRank {
                    route_id: "202".to_string(),
                    route_name: "Harbour Loop".to_string(),
                    on_time_pct: 62.5,
                    trip_count: 40,
                },
                ReliabilityRank {
                    route_id: "303".to_string(),
                    route_name: "Airport Express".to_string(),
                    on_time_pct: 88.0,
                    trip_count: 40,
                },
            ],
            ..Default::default()
        };
        let recs = synthesize(&summary(Some(90.0)), &views, &[], &ReportConfig::default());

        let reliability: Vec<_> = recs
            .iter()
            .filter(|r| r.rule_id == "low-reliability")
            .collect();
        assert_eq!(reliability.len(), 1);
        assert_eq!(reliability[0].route_id.as_deref(), Some("202"));
        assert!(reliability[0].rationale.contains("62.5%"));
    }

    #[test]
    fn test_low_productivity_rule_is_medium() {
        let views = RankedViews {
            bottom_productivity: vec![ProductivityRank {
                route_id: "404".to_string(),
                route_name: "Quarry Road".to_string(),
                boardings_per_hour: 6.2,
            }],
            ..Default::default()
        };
        let recs = synthesize(&summary(Some(90.0)), &views, &[], &ReportConfig::default());

        let productivity: Vec<_> = recs
            .iter()
            .filter(|r| r.rule_id == "low-productivity")
            .collect();
        assert_eq!(productivity.len(), 1);
        assert_eq!(productivity[0].priority, Priority::Medium);
    }

    #[test]
    fn test_system_rules_fire_on_summary() {
        let recs = synthesize(
            &summary(Some(70.0)),
            &RankedViews::default(),
            &[],
            &ReportConfig::default(),
        );
        assert!(recs.iter().any(|r| r.rule_id == "reliability-program"));
        assert!(!recs.iter().any(|r| r.rule_id == "demand-forecasting"));

        let recs = synthesize(
            &summary(Some(92.0)),
            &RankedViews::default(),
            &[],
            &ReportConfig::default(),
        );
        assert!(!recs.iter().any(|r| r.rule_id == "reliability-program"));
        assert!(recs.iter().any(|r| r.rule_id == "demand-forecasting"));
    }

    #[test]
    fn test_no_system_rules_without_timing_data() {
        let recs = synthesize(
            &summary(None),
            &RankedViews::default(),
            &[],
            &ReportConfig::default(),
        );
        assert!(recs.is_empty());
    }

    #[test]
    fn test_peak_demand_rule_fires_above_threshold() {
        let periods = vec![am_peak(62_000)];
        let recs = synthesize(
            &summary(Some(90.0)),
            &RankedViews::default(),
            &periods,
            &ReportConfig::default(),
        );

        let peak: Vec<_> = recs
            .iter()
            .filter(|r| r.rule_id == "peak-demand-integration")
            .collect();
        assert_eq!(peak.len(), 1);
        assert_eq!(peak[0].priority, Priority::Medium);
        assert_eq!(peak[0].category, Category::RegionalIntegration);
        assert_eq!(peak[0].route_id, None);
        assert!(peak[0].rationale.contains("62000 boardings"));
    }

    #[test]
    fn test_peak_demand_rule_quiet_below_threshold() {
        let periods = vec![am_peak(310)];
        let recs = synthesize(
            &summary(Some(90.0)),
            &RankedViews::default(),
            &periods,
            &ReportConfig::default(),
        );
        assert!(!recs.iter().any(|r| r.rule_id == "peak-demand-integration"));
    }

    #[test]
    fn test_priority_ordering_with_declaration_order_within() {
        let views = RankedViews {
            top_boardings: vec![boardings_rank("101", 45.0)],
            lowest_reliability: vec![ReliabilityRank {
                route_id: "202".to_string(),
                route_name: "Harbour Loop".to_string(),
                on_time_pct: 50.0,
                trip_count: 40,
            }],
            bottom_productivity: vec![ProductivityRank {
                route_id: "404".to_string(),
                route_name: "Quarry Road".to_string(),
                boardings_per_hour: 3.0,
            }],
            ..Default::default()
        };
        let periods = vec![am_peak(60_000)];
        let recs = synthesize(&summary(Some(82.0)), &views, &periods, &ReportConfig::default());

        let ids: Vec<&str> = recs.iter().map(|r| r.rule_id).collect();
        assert_eq!(
            ids,
            vec![
                "high-boardings-per-trip",
                "low-reliability",
                "reliability-program",
                "low-productivity",
                "peak-demand-integration",
                "demand-forecasting",
            ]
        );
    }

    #[test]
    fn test_estimates_come_from_static_table() {
        let views = RankedViews {
            top_boardings: vec![boardings_rank("101", 45.0)],
            ..Default::default()
        };
        let recs = synthesize(&summary(Some(90.0)), &views, &[], &ReportConfig::default());
        let rec = recs
            .iter()
            .find(|r| r.rule_id == "high-boardings-per-trip")
            .unwrap();
        assert_eq!(rec.implementation_timeline, "2-3 months");
        assert!(rec.estimated_cost.contains("$80K"));
    }
}
