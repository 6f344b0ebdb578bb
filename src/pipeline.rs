use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::db::core::Database;
use crate::db::supplier::SinkOutcome;
use crate::report;
use crate::sources::{load_crawl_records, load_gap_records, load_registry_records};
use crate::supplier::fusion::{AbsorbOutcome, CanonicalStore};
use crate::supplier::scoring::quality_score;
use crate::supplier::targets::TargetDomainSet;
use crate::validation::{validate_store, HttpProbe, RatePolicy};
use crate::{TARGET_DB, TARGET_PIPELINE};

/// Counters for one resolution run. Every raw record lands in exactly
/// one of created, merged, or skipped, so
/// `total_raw_records == final_canonical_count + duplicates_merged + skipped_records`
/// holds at the end of every run.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub total_raw_records: usize,
    pub skipped_records: usize,
    pub duplicates_merged: usize,
    pub final_canonical_count: usize,
    pub target_matches: usize,
    pub invalid_documents: usize,
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunSummary {
    pub stats: RunStats,
    pub sink: Option<SinkOutcome>,
}

/// Execute one full resolution run: load every configured source, fuse
/// records into the canonical store, validate declared documents, flag
/// target matches, write the outputs, and optionally sync the result
/// into SQLite.
pub async fn run(config: &PipelineConfig) -> Result<RunSummary> {
    info!(target: TARGET_PIPELINE, "Starting supplier resolution run");

    let targets = match &config.target_list_path {
        Some(path) => TargetDomainSet::load(path)?,
        None => {
            warn!(
                target: TARGET_PIPELINE,
                "No target list configured; target matching disabled"
            );
            TargetDomainSet::default()
        }
    };

    // Load order is crawl, registry, gap: higher-trust observations
    // first, so they become the display names of merged entries.
    let mut raw_records = Vec::new();
    if let Some(path) = &config.crawl_path {
        raw_records.extend(load_crawl_records(path)?);
    }
    if let Some(path) = &config.registry_path {
        raw_records.extend(load_registry_records(path)?);
    }
    if let Some(path) = &config.gap_path {
        raw_records.extend(load_gap_records(path)?);
    }
    if raw_records.is_empty() {
        warn!(target: TARGET_PIPELINE, "No source records loaded; outputs will be empty");
    }

    let mut stats = RunStats::default();
    let mut store = CanonicalStore::new(config.similarity_threshold);
    for record in raw_records {
        stats.total_raw_records += 1;
        match store.absorb(record) {
            AbsorbOutcome::Created => {}
            AbsorbOutcome::Merged => stats.duplicates_merged += 1,
            AbsorbOutcome::Rejected => stats.skipped_records += 1,
        }
    }
    stats.final_canonical_count = store.len();
    info!(
        target: TARGET_PIPELINE,
        "Fused {} raw records into {} canonical suppliers ({} merged, {} skipped)",
        stats.total_raw_records,
        stats.final_canonical_count,
        stats.duplicates_merged,
        stats.skipped_records
    );

    if config.validate_urls {
        let probe = HttpProbe::new(config.request_timeout)?;
        let policy = RatePolicy::new(config.max_concurrency, config.request_delay);
        stats.invalid_documents = validate_store(&mut store, &probe, &policy).await;
    } else {
        info!(
            target: TARGET_PIPELINE,
            "Document validation disabled; reachability left unknown"
        );
    }

    for record in store.records_mut() {
        record.is_target_match = targets.matches_website(record.website.as_deref());
        if record.is_target_match {
            stats.target_matches += 1;
        }
        record.quality_score = quality_score(record);
    }

    let mut records = store.into_records();
    report::sort_by_score(&mut records);
    report::write_dataset(&config.output_path, &records)?;
    report::write_invalid_list(&config.invalid_list_path, &records)?;
    report::write_report(&config.report_path, &stats, &records)?;
    report::print_leaderboard(&records);

    let sink = match &config.database_path {
        Some(database_path) => {
            let db = Database::new(database_path)
                .await
                .context("failed to open supplier database")?;
            let outcome = db.upsert_suppliers(&records, config.batch_size).await;
            info!(
                target: TARGET_DB,
                "Database sync complete: {} rows written, {} batches failed",
                outcome.rows_written, outcome.batches_failed
            );
            Some(outcome)
        }
        None => {
            warn!(
                target: TARGET_PIPELINE,
                "No database configured; skipping supplier sync"
            );
            None
        }
    };

    info!(
        target: TARGET_PIPELINE,
        "Run complete: {} canonical suppliers, {} target matches, {} invalid documents",
        stats.final_canonical_count,
        stats.target_matches,
        stats.invalid_documents
    );
    Ok(RunSummary { stats, sink })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::CanonicalSupplierRecord;
    use std::fs;
    use std::path::Path;

    fn write_fixtures(dir: &Path) -> PipelineConfig {
        let crawl = dir.join("crawl.json");
        fs::write(
            &crawl,
            r#"[
                {
                    "supplier_name": "GreenSteel Inc.",
                    "website": "https://greensteel.example.com",
                    "contact_email": "sales@greensteel.example.com"
                },
                {
                    "supplier_name": "Roxul Insulation",
                    "website": "https://www.roxul.com",
                    "contact_phone": "800-555-0100"
                },
                {
                    "website": "https://nameless.example.com"
                }
            ]"#,
        )
        .unwrap();

        let registry = dir.join("registry.json");
        fs::write(
            &registry,
            r#"[
                {
                    "supplier_name": "Greensteel Incorporated",
                    "document_url": "https://epd.example.com/greensteel.pdf",
                    "material_type": "steel"
                }
            ]"#,
        )
        .unwrap();

        let gap = dir.join("gap.csv");
        fs::write(
            &gap,
            "supplier_name,category,masterformat_code\nBoral Brick,Masonry,04 20 00\n",
        )
        .unwrap();

        let targets = dir.join("targets.txt");
        fs::write(&targets, "# hunted\nroxul.com\n").unwrap();

        PipelineConfig {
            crawl_path: Some(crawl),
            registry_path: Some(registry),
            gap_path: Some(gap),
            target_list_path: Some(targets),
            output_path: dir.join("out/suppliers.json"),
            report_path: dir.join("out/report.md"),
            invalid_list_path: dir.join("out/invalid.csv"),
            validate_urls: false,
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_run_without_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixtures(dir.path());

        let summary = run(&config).await.unwrap();
        let stats = &summary.stats;

        assert_eq!(stats.total_raw_records, 5);
        assert_eq!(stats.skipped_records, 1);
        assert_eq!(stats.duplicates_merged, 1);
        assert_eq!(stats.final_canonical_count, 3);
        // Conservation: every raw record is accounted for exactly once.
        assert_eq!(
            stats.total_raw_records,
            stats.final_canonical_count + stats.duplicates_merged + stats.skipped_records
        );
        assert_eq!(stats.target_matches, 1);
        assert_eq!(stats.invalid_documents, 0);
        assert!(summary.sink.is_none());

        let dataset: Vec<CanonicalSupplierRecord> =
            serde_json::from_str(&fs::read_to_string(&config.output_path).unwrap()).unwrap();
        assert_eq!(dataset.len(), 3);

        // Scores are non-increasing down the dataset.
        for pair in dataset.windows(2) {
            assert!(pair[0].quality_score >= pair[1].quality_score);
        }

        let greensteel = dataset
            .iter()
            .find(|r| r.supplier_name == "GreenSteel Inc.")
            .unwrap();
        assert!(greensteel.has_carbon_declaration);
        assert_eq!(
            greensteel.declaration_url.as_deref(),
            Some("https://epd.example.com/greensteel.pdf")
        );
        // Validation never ran, so reachability stays unknown.
        assert_eq!(greensteel.declaration_url_valid, None);
        assert_eq!(greensteel.contributing_sources.len(), 2);

        let roxul = dataset
            .iter()
            .find(|r| r.supplier_name == "Roxul Insulation")
            .unwrap();
        assert!(roxul.is_target_match);

        let report = fs::read_to_string(&config.report_path).unwrap();
        assert!(report.contains("- **Skipped Malformed Records:** 1"));
        assert!(report.contains("- **Target-List Matches:** 1"));

        let invalid = fs::read_to_string(&config.invalid_list_path).unwrap();
        assert_eq!(invalid.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_configured_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_fixtures(dir.path());
        config.crawl_path = Some(dir.path().join("no-such-file.json"));

        assert!(run(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_sources_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_fixtures(dir.path());
        config.crawl_path = None;
        config.registry_path = None;

        let summary = run(&config).await.unwrap();
        // Only the gap CSV row is left.
        assert_eq!(summary.stats.total_raw_records, 1);
        assert_eq!(summary.stats.final_canonical_count, 1);
        assert_eq!(summary.stats.target_matches, 0);
    }
}
