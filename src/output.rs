//! Report export and formatting.
//!
//! Supports pretty-printed logging, a JSON artifact, a plain-text summary
//! report, and a per-route CSV for spreadsheet work.

use anyhow::Result;
use std::fs;
use tracing::{debug, info};

use crate::analyzers::types::Report;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the full report as a pretty-printed JSON artifact.
pub fn write_json(path: &str, report: &Report) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(report)?)?;
    info!(path, "Report JSON written");
    Ok(())
}

/// Writes the per-route aggregates as CSV, one row per route in report
/// order.
pub fn write_route_csv(path: &str, report: &Report) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for route in &report.routes {
        writer.serialize(route)?;
    }
    writer.flush()?;
    info!(path, routes = report.routes.len(), "Route CSV written");
    Ok(())
}

/// Renders the human-readable summary report.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);
    let s = &report.summary;

    out.push_str(&format!("{rule}\n"));
    out.push_str("TRANSIT PERFORMANCE ANALYSIS REPORT\n");
    out.push_str(&format!("{rule}\n\n"));
    out.push_str(&format!(
        "Generated: {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str("EXECUTIVE SUMMARY\n");
    out.push_str(&format!("{thin}\n"));
    out.push_str(&format!(
        "* Analyzed {} trip records across {} routes from {} to {}\n",
        s.total_records, s.unique_route_count, s.date_range.start, s.date_range.end
    ));
    if let Some(pct) = s.system_on_time_pct {
        out.push_str(&format!(
            "* System-wide on-time performance at {pct:.1}%\n"
        ));
    }
    if let Some(top) = report.rankings.top_boardings.first() {
        out.push_str(&format!(
            "* Route {} ({}) leads ridership with {} total boardings\n",
            top.route_id, top.route_name, top.total_boardings
        ));
    }
    out.push('\n');

    out.push_str("KEY PERFORMANCE INDICATORS\n");
    out.push_str(&format!("{thin}\n"));
    match s.system_on_time_pct {
        Some(pct) => out.push_str(&format!("System On-Time Performance: {pct:.1}%\n")),
        None => out.push_str("System On-Time Performance: n/a (no timing data)\n"),
    }
    out.push_str(&format!("Total Boardings: {}\n", s.total_boardings));
    out.push_str(&format!("Routes Analyzed: {}\n\n", s.unique_route_count));

    out.push_str("OPTIMIZATION RECOMMENDATIONS\n");
    out.push_str(&format!("{thin}\n"));
    out.push_str("Impact and cost figures are indicative planning estimates, not values\n");
    out.push_str("derived from this dataset.\n\n");
    if report.recommendations.is_empty() {
        out.push_str("No rules fired for this dataset.\n");
    }
    for (i, rec) in report.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. [{}] {}\n", i + 1, rec.priority, rec.action));
        out.push_str(&format!("   Category: {}\n", rec.category));
        out.push_str(&format!("   Rationale: {}\n", rec.rationale));
        out.push_str(&format!("   Impact: {}\n", rec.estimated_impact));
        out.push_str(&format!("   Cost: {}\n", rec.estimated_cost));
        out.push_str(&format!(
            "   Timeline: {}\n\n",
            rec.implementation_timeline
        ));
    }

    out
}

/// Writes the summary report to `path`.
pub fn write_summary_text(path: &str, report: &Report) -> Result<()> {
    fs::write(path, render_summary(report))?;
    info!(path, "Summary report written");
    Ok(())
}
