use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::supplier::{RawSupplierRecord, SupplierSource};
use crate::TARGET_PIPELINE;

/// One row exported from a carbon-declaration registry. Presence in the
/// registry is itself the evidence: every row implies a declaration even
/// when the document URL was not captured.
#[derive(Debug, Deserialize)]
pub struct RegistryRow {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
}

pub fn load_registry_records(path: &Path) -> Result<Vec<RawSupplierRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file {}", path.display()))?;
    let rows: Vec<RegistryRow> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse registry file {}", path.display()))?;

    info!(
        target: TARGET_PIPELINE,
        "Loaded {} carbon-registry rows from {}",
        rows.len(),
        path.display()
    );

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut record =
                RawSupplierRecord::new(&row.supplier_name, SupplierSource::CarbonRegistry)
                    .with_certifications(vec!["EPD".to_string()])
                    .with_declared_document(row.document_url);
            record.description = row
                .material_type
                .as_deref()
                .map(|material| format!("Supplier of {} materials.", material));
            record
        })
        .collect())
}
