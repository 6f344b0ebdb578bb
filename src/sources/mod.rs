pub mod crawl;
pub mod gap;
pub mod registry;

pub use crawl::load_crawl_records;
pub use gap::load_gap_records;
pub use registry::load_registry_records;
