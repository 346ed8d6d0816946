//! Pipeline orchestration: raw rows in, report plus rejection summary out.

use chrono::Utc;
use tracing::{debug, info};

use crate::analyzers::aggregate::aggregate_records;
use crate::analyzers::rank::rank_routes;
use crate::analyzers::recommend::synthesize;
use crate::analyzers::types::Report;
use crate::config::ReportConfig;
use crate::error::{RejectedRow, RunError};
use crate::normalize::{RawRow, normalize_rows};

/// A successful run: the report plus the per-row rejections and timing flags
/// collected along the way, so callers can present both.
#[derive(Debug)]
pub struct ReportOutcome {
    pub report: Report,
    pub rejected: Vec<RejectedRow>,
    pub timing_flags: Vec<RejectedRow>,
}

/// Runs the full pipeline over one batch of raw rows.
///
/// Per-row failures never abort the run; they ride along in the outcome.
///
/// # Errors
///
/// [`RunError::OversizedInput`] when the row cap is exceeded (checked before
/// any processing), [`RunError::EmptyInput`] when normalization leaves no
/// valid records.
pub fn generate(rows: Vec<RawRow>, cfg: &ReportConfig) -> Result<ReportOutcome, RunError> {
    if rows.len() > cfg.max_rows {
        return Err(RunError::OversizedInput {
            what: "row count",
            limit: cfg.max_rows as u64,
            actual: rows.len() as u64,
        });
    }

    let batch = normalize_rows(rows);
    info!(
        valid = batch.records.len(),
        rejected = batch.rejected.len(),
        flagged = batch.timing_flags.len(),
        "Rows normalized"
    );

    let aggregated = aggregate_records(&batch.records, cfg)?;
    debug!(routes = aggregated.routes.len(), "Aggregation complete");

    let rankings = rank_routes(&aggregated.routes, cfg);
    let recommendations = synthesize(
        &aggregated.summary,
        &rankings,
        &aggregated.period_comparison,
        cfg,
    );
    info!(
        recommendations = recommendations.len(),
        "Report synthesized"
    );

    Ok(ReportOutcome {
        report: Report {
            schema_version: 1,
            generated_at: Utc::now(),
            summary: aggregated.summary,
            routes: aggregated.routes,
            period_comparison: aggregated.period_comparison,
            service_type_productivity: aggregated.service_type_productivity,
            rankings,
            recommendations,
        },
        rejected: batch.rejected,
        timing_flags: batch.timing_flags,
    })
}
