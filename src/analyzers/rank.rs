//! Ordered views over the route aggregates.
//!
//! Pure function of the aggregate values: re-ordering the input rows never
//! changes a ranking. All ties break by ascending route id.

use crate::analyzers::types::{
    BoardingsRank, ProductivityRank, RankedViews, ReliabilityRank, RouteAggregate,
};
use crate::config::ReportConfig;

pub fn rank_routes(routes: &[RouteAggregate], cfg: &ReportConfig) -> RankedViews {
    let mut by_boardings: Vec<&RouteAggregate> = routes.iter().collect();
    by_boardings.sort_by(|a, b| {
        b.total_boardings
            .cmp(&a.total_boardings)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
    by_boardings.truncate(cfg.top_boardings_n);

    // Routes without a productivity figure are omitted, not treated as zero.
    let mut by_productivity: Vec<(&RouteAggregate, f64)> = routes
        .iter()
        .filter_map(|r| r.boardings_per_hour.map(|bph| (r, bph)))
        .collect();
    by_productivity.sort_by(|(a, a_bph), (b, b_bph)| {
        a_bph
            .total_cmp(b_bph)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
    by_productivity.truncate(cfg.bottom_productivity_n);

    // Small samples are statistically noisy; keep them out of the
    // reliability extremes (they stay in the full aggregate list).
    let reliable: Vec<(&RouteAggregate, f64)> = routes
        .iter()
        .filter(|r| r.trip_count >= cfg.min_reliability_sample)
        .filter_map(|r| r.on_time_pct.map(|p| (r, p)))
        .collect();

    let mut highest = reliable.clone();
    highest.sort_by(|(a, a_pct), (b, b_pct)| {
        b_pct
            .total_cmp(a_pct)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
    highest.truncate(cfg.reliability_n);

    let mut lowest = reliable;
    lowest.sort_by(|(a, a_pct), (b, b_pct)| {
        a_pct
            .total_cmp(b_pct)
            .then_with(|| a.route_id.cmp(&b.route_id))
    });
    lowest.truncate(cfg.reliability_n);

    RankedViews {
        top_boardings: by_boardings
            .into_iter()
            .map(|r| BoardingsRank {
                route_id: r.route_id.clone(),
                route_name: r.route_name.clone(),
                total_boardings: r.total_boardings,
                boardings_per_trip: r.boardings_per_trip,
            })
            .collect(),
        bottom_productivity: by_productivity
            .into_iter()
            .map(|(r, bph)| ProductivityRank {
                route_id: r.route_id.clone(),
                route_name: r.route_name.clone(),
                boardings_per_hour: bph,
            })
            .collect(),
        highest_reliability: to_reliability(highest),
        lowest_reliability: to_reliability(lowest),
    }
}

fn to_reliability(entries: Vec<(&RouteAggregate, f64)>) -> Vec<ReliabilityRank> {
    entries
        .into_iter()
        .map(|(r, pct)| ReliabilityRank {
            route_id: r.route_id.clone(),
            route_name: r.route_name.clone(),
            on_time_pct: pct,
            trip_count: r.trip_count,
        })
        .collect()
}
