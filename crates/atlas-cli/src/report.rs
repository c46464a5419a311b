//! Rendering of alignment results for stdout.

use atlas_types::AlignmentSummary;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;

/// One run's result as written to stdout.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: AlignmentSummary,
}

impl RunReport {
    pub fn new(summary: AlignmentSummary) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            summary,
        }
    }
}

/// Pretty-printed JSON document.
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Human-readable summary.
pub fn render_text(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        "beacons:".bold(),
        summary.beacon_count.to_string().green().bold()
    ));
    out.push_str(&format!(
        "{} {}\n",
        "max scanner distance:".bold(),
        summary.max_scanner_distance
    ));

    out.push_str(&format!(
        "{} ({} resolved)\n",
        "scanners".bold(),
        summary.scanners.len()
    ));
    for placement in &summary.scanners {
        out.push_str(&format!(
            "  {} {:<12} at {:>20}  rotation #{}\n",
            "✓".green(),
            placement.id.to_string(),
            placement.position.to_string(),
            placement.rotation
        ));
    }

    if !summary.unresolved.is_empty() {
        out.push_str(&format!(
            "{} ({} unresolved)\n",
            "warning".yellow().bold(),
            summary.unresolved.len()
        ));
        for id in &summary.unresolved {
            out.push_str(&format!("  {} {id}\n", "✗".red()));
        }
    }
    out
}
