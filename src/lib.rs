pub mod config;
pub mod db;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod supplier;
pub mod validation;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_PIPELINE: &str = "pipeline";
pub const TARGET_DB: &str = "db_query";
