//! Report writing.
//!
//! The durable sink is a JSON file holding the full `RunReport`; the
//! console gets the short human summary the operator actually reads.

use anyhow::{Context, Result};
use quotient_batch::RunReport;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write the full report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }
    let file = File::create(path)
        .with_context(|| format!("cannot create report file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("cannot write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Print the run summary block.
pub fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    let elapsed = report.finished_at - report.started_at;

    println!();
    println!("{}", "=".repeat(60));
    println!("BATCH SUMMARY  (run {})", report.run_key);
    println!("{}", "=".repeat(60));
    println!("Parts processed:    {}", summary.parts_total);
    println!("Requests sent:      {}", summary.sent);
    println!("Failed:             {}", summary.failed);
    println!("Omitted:            {}", summary.omitted);
    println!("No suppliers:       {}", summary.no_suppliers);
    if !report.failed_parts.is_empty() {
        println!("Parts not searched: {}", report.failed_parts.len());
    }
    println!("Elapsed:            {}s", elapsed.num_seconds());
    println!("{}", "-".repeat(60));
    println!("SUPPLIER DISTRIBUTION");
    println!("Unique suppliers:   {}", summary.supplier_frequency.len());
    for usage in summary.supplier_frequency.iter().take(10) {
        let share = if summary.sent > 0 {
            usage.sent as f64 / summary.sent as f64 * 100.0
        } else {
            0.0
        };
        println!("  {}: {} requests ({share:.1}%)", usage.supplier, usage.sent);
    }
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quotient_core::RunKey;

    #[test]
    fn test_write_report_creates_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("reports").join("run.json");
        let key = RunKey::new("1008627").expect("key");
        let report = RunReport::new(&key, Utc::now(), 0, vec![], vec![], vec![]);

        write_report(&path, &report).expect("write");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("\"run_key\": \"1008627\""));
    }
}
