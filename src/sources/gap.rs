use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::supplier::{RawSupplierRecord, SupplierSource};
use crate::TARGET_PIPELINE;

/// One row of the gap-analysis CSV: suppliers we know we are missing,
/// tagged with the product category and MasterFormat section they were
/// identified from.
#[derive(Debug, Deserialize)]
pub struct GapRow {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub masterformat_code: Option<String>,
}

pub fn load_gap_records(path: &Path) -> Result<Vec<RawSupplierRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read gap-analysis file {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<GapRow>() {
        let row =
            row.with_context(|| format!("failed to parse gap-analysis file {}", path.display()))?;
        let mut record = RawSupplierRecord::new(&row.supplier_name, SupplierSource::GapList);
        record.description = row
            .category
            .as_deref()
            .map(|category| format!("Identified gap supplier for {}", category));
        record.masterformat_codes = row
            .masterformat_code
            .into_iter()
            .filter(|code| !code.trim().is_empty())
            .collect();
        records.push(record);
    }

    info!(
        target: TARGET_PIPELINE,
        "Loaded {} gap-analysis rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_gap_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "supplier_name,category,masterformat_code").unwrap();
        writeln!(file, "Boral Brick,Masonry,04 20 00").unwrap();
        writeln!(file, "Quiet Quarry,,").unwrap();
        file.flush().unwrap();

        let records = load_gap_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].supplier_name, "Boral Brick");
        assert_eq!(
            records[0].description.as_deref(),
            Some("Identified gap supplier for Masonry")
        );
        assert_eq!(records[0].masterformat_codes, vec!["04 20 00"]);
        assert_eq!(records[0].source, SupplierSource::GapList);

        // Empty CSV cells load as None and carry nothing.
        assert_eq!(records[1].supplier_name, "Quiet Quarry");
        assert!(records[1].description.is_none());
        assert!(records[1].masterformat_codes.is_empty());
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "supplier_name,category,masterformat_code").unwrap();
        writeln!(file, "Too,Many,Fields,Here,Extra").unwrap();
        file.flush().unwrap();

        assert!(load_gap_records(file.path()).is_err());
    }
}
