use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_CONCURRENCY: usize = 1;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Everything a single resolution run needs. Input paths left as `None`
/// are skipped; output paths always get written.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub crawl_path: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
    pub gap_path: Option<PathBuf>,
    pub target_list_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub report_path: PathBuf,
    pub invalid_list_path: PathBuf,
    pub database_path: Option<String>,
    pub similarity_threshold: f64,
    pub validate_urls: bool,
    pub batch_size: usize,
    pub request_timeout: Duration,
    pub request_delay: Duration,
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            crawl_path: None,
            registry_path: None,
            gap_path: None,
            target_list_path: None,
            output_path: PathBuf::from("dataset/suppliers.json"),
            report_path: PathBuf::from("dataset/fusion-report.md"),
            invalid_list_path: PathBuf::from("dataset/invalid-documents.csv"),
            database_path: None,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            validate_urls: true,
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
