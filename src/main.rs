use anyhow::Result;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use terrazzo::config::{
    PipelineConfig, DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_DELAY,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SIMILARITY_THRESHOLD,
};
use terrazzo::pipeline;

#[derive(Parser)]
#[command(
    name = "terrazzo",
    about = "Resolve and fuse supplier records from crawls, registries, and gap lists"
)]
struct Cli {
    /// Site-crawl JSON export to load
    #[arg(long, value_name = "FILE")]
    crawl: Option<PathBuf>,

    /// Carbon-declaration registry JSON export to load
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Gap-analysis CSV to load
    #[arg(long, value_name = "FILE")]
    gap: Option<PathBuf>,

    /// Target-domain list, one URL or domain per line
    #[arg(long, value_name = "FILE")]
    targets: Option<PathBuf>,

    /// Where to write the canonical dataset JSON
    #[arg(long, value_name = "FILE", default_value = "dataset/suppliers.json")]
    output: PathBuf,

    /// Where to write the human-readable run report
    #[arg(long, value_name = "FILE", default_value = "dataset/fusion-report.md")]
    report: PathBuf,

    /// Where to write the list of suppliers with unreachable documents
    #[arg(long, value_name = "FILE", default_value = "dataset/invalid-documents.csv")]
    invalid_list: PathBuf,

    /// SQLite database to sync results into (falls back to DATABASE_PATH)
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Similarity threshold for fuzzy name matching, 0.0 to 1.0
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    similarity_threshold: f64,

    /// Skip probing declared document URLs
    #[arg(long)]
    skip_validation: bool,

    /// Database upsert batch size
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Per-request timeout for document probing, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Quiet time between probe batches, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY.as_millis() as u64)]
    request_delay_ms: u64,

    /// How many probes may be in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            crawl_path: self.crawl,
            registry_path: self.registry,
            gap_path: self.gap,
            target_list_path: self.targets,
            output_path: self.output,
            report_path: self.report,
            invalid_list_path: self.invalid_list,
            database_path: self.database.or_else(|| env::var("DATABASE_PATH").ok()),
            similarity_threshold: self.similarity_threshold,
            validate_urls: !self.skip_validation,
            batch_size: self.batch_size,
            request_timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_millis(self.request_delay_ms),
            max_concurrency: self.max_concurrency,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    terrazzo::logging::configure_logging();

    let cli = Cli::parse();
    let config = cli.into_config();

    let summary = pipeline::run(&config).await?;
    info!(
        "Resolved {} canonical suppliers ({} merged, {} skipped, {} target matches)",
        summary.stats.final_canonical_count,
        summary.stats.duplicates_merged,
        summary.stats.skipped_records,
        summary.stats.target_matches
    );

    Ok(())
}
