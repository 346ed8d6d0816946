//! Single-pass aggregation of trip records into per-route and system-wide
//! statistics.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::analyzers::types::{
    DateRange, PeriodAggregate, RouteAggregate, ServiceTypeAggregate, SystemSummary, TimePeriod,
};
use crate::analyzers::utility::{correlation, pct};
use crate::config::ReportConfig;
use crate::error::RunError;
use crate::normalize::{ServiceType, TripRecord};

/// Aggregation result: routes in first-occurrence order plus the summary
/// and the period and service-type rollups.
#[derive(Debug)]
pub struct Aggregated {
    pub routes: Vec<RouteAggregate>,
    pub summary: SystemSummary,
    pub period_comparison: Vec<PeriodAggregate>,
    pub service_type_productivity: Vec<ServiceTypeAggregate>,
}

/// Per-route accumulator for the fold. Bounded state per route: daily span
/// endpoints, counters, and running sums.
#[derive(Debug)]
struct RouteBuilder {
    route_name: String,
    service_type: ServiceType,
    trip_count: usize,
    on_time: usize,
    minor_delay: usize,
    major_delay: usize,
    cancelled: usize,
    total_boardings: u64,
    supplied_hours: f64,
    delay_sum_min: f64,
    delay_count: usize,
    daily_span: HashMap<NaiveDate, (NaiveDateTime, NaiveDateTime)>,
}

impl RouteBuilder {
    fn new(rec: &TripRecord) -> Self {
        Self {
            route_name: rec.route_name.clone(),
            service_type: rec.service_type.clone(),
            trip_count: 0,
            on_time: 0,
            minor_delay: 0,
            major_delay: 0,
            cancelled: 0,
            total_boardings: 0,
            supplied_hours: 0.0,
            delay_sum_min: 0.0,
            delay_count: 0,
            daily_span: HashMap::new(),
        }
    }

    fn push(&mut self, rec: &TripRecord, cfg: &ReportConfig) {
        self.trip_count += 1;
        self.total_boardings += rec.boardings;

        // First non-empty name wins; later conflicting names are ignored.
        if self.route_name.is_empty() && !rec.route_name.is_empty() {
            self.route_name = rec.route_name.clone();
        }

        if let Some(hours) = rec.revenue_hours {
            self.supplied_hours += hours;
        }

        let Some(scheduled) = rec.scheduled_departure else {
            // No scheduled time: boardings count, timing does not.
            return;
        };

        let span = self
            .daily_span
            .entry(rec.trip_date)
            .or_insert((scheduled, scheduled));
        if scheduled < span.0 {
            span.0 = scheduled;
        }
        if scheduled > span.1 {
            span.1 = scheduled;
        }

        match rec.actual_departure {
            Some(actual) => {
                let delay_min = (actual - scheduled).num_seconds() as f64 / 60.0;
                self.delay_sum_min += delay_min;
                self.delay_count += 1;

                if delay_min <= cfg.on_time_tolerance_min {
                    self.on_time += 1;
                } else if delay_min <= cfg.minor_delay_cutoff_min {
                    self.minor_delay += 1;
                } else {
                    self.major_delay += 1;
                }
            }
            None => self.cancelled += 1,
        }
    }

    fn finish(self, route_id: String) -> RouteAggregate {
        let timed = self.on_time + self.minor_delay + self.major_delay + self.cancelled;

        let revenue_hours = if self.supplied_hours > 0.0 {
            Some(self.supplied_hours)
        } else {
            let span_hours: f64 = self
                .daily_span
                .values()
                .map(|(first, last)| (*last - *first).num_seconds() as f64 / 3600.0)
                .sum();
            (span_hours > 0.0).then_some(span_hours)
        };

        RouteAggregate {
            boardings_per_trip: self.total_boardings as f64 / self.trip_count as f64,
            boardings_per_hour: revenue_hours.map(|h| self.total_boardings as f64 / h),
            on_time_pct: pct(self.on_time, timed),
            mean_delay_min: (self.delay_count > 0)
                .then(|| self.delay_sum_min / self.delay_count as f64),
            route_id,
            route_name: self.route_name,
            service_type: self.service_type,
            trip_count: self.trip_count,
            timed_trip_count: timed,
            on_time_count: self.on_time,
            minor_delay_count: self.minor_delay,
            major_delay_count: self.major_delay,
            cancelled_count: self.cancelled,
            total_boardings: self.total_boardings,
            revenue_hours,
        }
    }
}

/// Folds validated records into [`RouteAggregate`]s (grouped by `route_id`,
/// first occurrence fixing the output order) and a [`SystemSummary`].
///
/// # Errors
///
/// Returns [`RunError::EmptyInput`] for an empty record collection; a
/// degenerate empty report is never produced.
pub fn aggregate_records(
    records: &[TripRecord],
    cfg: &ReportConfig,
) -> Result<Aggregated, RunError> {
    let (first, rest) = records.split_first().ok_or(RunError::EmptyInput)?;

    let mut builders: HashMap<String, RouteBuilder> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut date_start = first.trip_date;
    let mut date_end = first.trip_date;
    let mut total_boardings: u64 = 0;
    let mut period_trips = [0usize; 4];
    let mut period_boardings = [0u64; 4];

    for rec in std::iter::once(first).chain(rest) {
        builders
            .entry(rec.route_id.clone())
            .or_insert_with(|| {
                order.push(rec.route_id.clone());
                RouteBuilder::new(rec)
            })
            .push(rec, cfg);

        date_start = date_start.min(rec.trip_date);
        date_end = date_end.max(rec.trip_date);
        total_boardings += rec.boardings;

        if let Some(period) = TimePeriod::classify(rec.trip_date, rec.scheduled_departure) {
            period_trips[period.index()] += 1;
            period_boardings[period.index()] += rec.boardings;
        }
    }

    let mut routes = Vec::with_capacity(order.len());
    for route_id in order {
        if let Some(builder) = builders.remove(&route_id) {
            routes.push(builder.finish(route_id));
        }
    }

    let system_on_time: usize = routes.iter().map(|r| r.on_time_count).sum();
    let system_timed: usize = routes.iter().map(|r| r.timed_trip_count).sum();

    let (boardings_series, delay_series): (Vec<f64>, Vec<f64>) = routes
        .iter()
        .filter_map(|r| r.mean_delay_min.map(|d| (r.total_boardings as f64, d)))
        .unzip();

    let summary = SystemSummary {
        total_records: records.len(),
        unique_route_count: routes.len(),
        total_boardings,
        date_range: DateRange {
            start: date_start,
            end: date_end,
        },
        system_on_time_pct: pct(system_on_time, system_timed),
        delay_boarding_correlation: correlation(&boardings_series, &delay_series),
    };

    let period_comparison = TimePeriod::ALL
        .into_iter()
        .filter(|p| period_trips[p.index()] > 0)
        .map(|p| PeriodAggregate {
            period: p,
            trip_count: period_trips[p.index()],
            total_boardings: period_boardings[p.index()],
            boardings_per_trip: period_boardings[p.index()] as f64
                / period_trips[p.index()] as f64,
        })
        .collect();

    let service_type_productivity = roll_up_service_types(&routes);

    Ok(Aggregated {
        routes,
        summary,
        period_comparison,
        service_type_productivity,
    })
}

/// Groups finished route aggregates by service type, first occurrence fixing
/// the output order.
fn roll_up_service_types(routes: &[RouteAggregate]) -> Vec<ServiceTypeAggregate> {
    let mut groups: Vec<(ServiceType, Vec<&RouteAggregate>)> = Vec::new();
    for route in routes {
        match groups.iter_mut().find(|(st, _)| *st == route.service_type) {
            Some((_, members)) => members.push(route),
            None => groups.push((route.service_type.clone(), vec![route])),
        }
    }

    groups
        .into_iter()
        .map(|(service_type, members)| {
            let rates: Vec<f64> = members.iter().filter_map(|r| r.boardings_per_hour).collect();
            ServiceTypeAggregate {
                service_type,
                route_count: members.len(),
                total_boardings: members.iter().map(|r| r.total_boardings).sum(),
                avg_boardings_per_hour: (!rates.is_empty())
                    .then(|| rates.iter().sum::<f64>() / rates.len() as f64),
            }
        })
        .collect()
}
