use anyhow::{Context, Result};
use chrono::Utc;
use prettytable::{Cell, Row as PrettyRow, Table};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::pipeline::RunStats;
use crate::supplier::CanonicalSupplierRecord;
use crate::TARGET_PIPELINE;

const REPORT_TOP_N: usize = 10;

/// Sort canonical records by quality score, best first. The sort is
/// stable, so equal scores keep their first-seen order.
pub fn sort_by_score(records: &mut [CanonicalSupplierRecord]) {
    records.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
}

/// Write the full canonical dataset as pretty-printed JSON.
pub fn write_dataset(path: &Path, records: &[CanonicalSupplierRecord]) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(records)
        .context("failed to serialize canonical dataset")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write dataset {}", path.display()))?;
    info!(
        target: TARGET_PIPELINE,
        "Wrote {} canonical suppliers to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// Write the human-readable run report: counts plus the highest-scoring
/// suppliers. Expects `records` already sorted.
pub fn write_report(
    path: &Path,
    stats: &RunStats,
    records: &[CanonicalSupplierRecord],
) -> Result<()> {
    ensure_parent(path)?;

    let mut report = String::new();
    report.push_str("# Supplier Data Fusion Report\n\n");
    report.push_str(&format!("**Date:** {}\n\n", Utc::now().to_rfc3339()));
    report.push_str("## Statistics\n\n");
    report.push_str(&format!(
        "- **Total Raw Records Processed:** {}\n",
        stats.total_raw_records
    ));
    report.push_str(&format!(
        "- **Skipped Malformed Records:** {}\n",
        stats.skipped_records
    ));
    report.push_str(&format!(
        "- **Duplicates Merged:** {}\n",
        stats.duplicates_merged
    ));
    report.push_str(&format!(
        "- **Final Unique Suppliers:** {}\n",
        stats.final_canonical_count
    ));
    report.push_str(&format!(
        "- **Target-List Matches:** {}\n",
        stats.target_matches
    ));
    report.push_str(&format!(
        "- **Invalid Document URLs:** {}\n",
        stats.invalid_documents
    ));

    report.push_str("\n## Top Suppliers by Quality Score\n\n");
    for (rank, record) in records.iter().take(REPORT_TOP_N).enumerate() {
        report.push_str(&format!(
            "{}. **{}** (Score: {}) - {}\n",
            rank + 1,
            record.supplier_name,
            record.quality_score,
            record.source
        ));
    }

    fs::write(path, report)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    info!(target: TARGET_PIPELINE, "Wrote run report to {}", path.display());
    Ok(())
}

/// Write the side list of suppliers whose declared document URL failed
/// validation. Unvalidated URLs stay off the list.
pub fn write_invalid_list(path: &Path, records: &[CanonicalSupplierRecord]) -> Result<()> {
    ensure_parent(path)?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create invalid-document list {}", path.display()))?;
    writer
        .write_record(["supplier_name", "declaration_url"])
        .context("failed to write invalid-document list header")?;

    let mut written = 0;
    for record in records {
        if record.declaration_url_valid != Some(false) {
            continue;
        }
        if let Some(url) = &record.declaration_url {
            writer
                .write_record([record.supplier_name.as_str(), url.as_str()])
                .context("failed to write invalid-document row")?;
            written += 1;
        }
    }
    writer
        .flush()
        .with_context(|| format!("failed to write invalid-document list {}", path.display()))?;

    info!(
        target: TARGET_PIPELINE,
        "Wrote {} invalid document rows to {}",
        written,
        path.display()
    );
    Ok(())
}

/// Print the run's best records to the console.
pub fn print_leaderboard(records: &[CanonicalSupplierRecord]) {
    if records.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Rank"),
        Cell::new("Supplier"),
        Cell::new("Score"),
        Cell::new("Source"),
        Cell::new("Target"),
        Cell::new("Document"),
    ]));

    for (rank, record) in records.iter().take(REPORT_TOP_N).enumerate() {
        let document = match (record.has_carbon_declaration, record.declaration_url_valid) {
            (false, _) => "none",
            (true, None) => "unverified",
            (true, Some(true)) => "valid",
            (true, Some(false)) => "invalid",
        };
        table.add_row(PrettyRow::new(vec![
            Cell::new(&(rank + 1).to_string()),
            Cell::new(&record.supplier_name),
            Cell::new(&record.quality_score.to_string()),
            Cell::new(&record.source.to_string()),
            Cell::new(if record.is_target_match { "yes" } else { "" }),
            Cell::new(document),
        ]));
    }

    table.printstd();
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}
