use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::supplier::{RawSupplierRecord, SupplierSource};
use crate::TARGET_PIPELINE;

/// One row of site-crawl output. Every field is optional on the wire; a
/// row without a usable name still loads and gets rejected downstream,
/// where it can be counted.
#[derive(Debug, Deserialize)]
pub struct CrawlRow {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub headquarters_city: Option<String>,
    #[serde(default)]
    pub headquarters_state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Load a site-crawl JSON array. Crawl rows are first-party
/// observations, so they are stamped with the load time.
pub fn load_crawl_records(path: &Path) -> Result<Vec<RawSupplierRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read site-crawl file {}", path.display()))?;
    let rows: Vec<CrawlRow> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse site-crawl file {}", path.display()))?;

    info!(
        target: TARGET_PIPELINE,
        "Loaded {} site-crawl rows from {}",
        rows.len(),
        path.display()
    );

    let observed_at = Utc::now();
    Ok(rows
        .into_iter()
        .map(|row| RawSupplierRecord {
            supplier_name: row.supplier_name,
            website: row.website,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            address: row.address,
            headquarters_city: row.headquarters_city,
            headquarters_state: row.headquarters_state,
            description: row.description,
            certifications: row.certifications,
            masterformat_codes: Vec::new(),
            has_carbon_declaration: false,
            declaration_url: None,
            source: SupplierSource::SiteCrawl,
            observed_at: Some(observed_at),
        })
        .collect())
}
