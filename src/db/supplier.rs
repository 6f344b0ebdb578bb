use chrono::Utc;
use tracing::{debug, error};

use super::core::Database;
use crate::supplier::CanonicalSupplierRecord;
use crate::TARGET_DB;

/// What the database sync managed to write
#[derive(Debug, Default, Clone)]
pub struct SinkOutcome {
    pub rows_written: usize,
    pub batches_failed: usize,
}

impl Database {
    /// Upsert canonical records keyed by supplier name, in batches, each
    /// batch in its own transaction. A failed batch is logged and
    /// skipped; the remaining batches still run.
    pub async fn upsert_suppliers(
        &self,
        records: &[CanonicalSupplierRecord],
        batch_size: usize,
    ) -> SinkOutcome {
        let mut outcome = SinkOutcome::default();

        for (batch_index, batch) in records.chunks(batch_size.max(1)).enumerate() {
            match self.upsert_supplier_batch(batch).await {
                Ok(count) => {
                    outcome.rows_written += count;
                    debug!(
                        target: TARGET_DB,
                        "Supplier batch {} upserted {} rows", batch_index, count
                    );
                }
                Err(err) => {
                    outcome.batches_failed += 1;
                    error!(
                        target: TARGET_DB,
                        "Supplier batch {} failed, continuing: {}", batch_index, err
                    );
                }
            }
        }

        outcome
    }

    async fn upsert_supplier_batch(
        &self,
        batch: &[CanonicalSupplierRecord],
    ) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        let updated_at = Utc::now().to_rfc3339();

        for record in batch {
            let certifications = serde_json::to_string(&record.certifications)
                .map_err(|e| sqlx::Error::Protocol(format!("Invalid JSON: {}", e)))?;
            let masterformat_codes = serde_json::to_string(&record.masterformat_codes)
                .map_err(|e| sqlx::Error::Protocol(format!("Invalid JSON: {}", e)))?;
            let contributing_sources = serde_json::to_string(&record.contributing_sources)
                .map_err(|e| sqlx::Error::Protocol(format!("Invalid JSON: {}", e)))?;

            sqlx::query(
                r#"
                INSERT INTO suppliers (
                    supplier_name, normalized_name, website, contact_email,
                    contact_phone, address, headquarters_city, headquarters_state,
                    description, certifications, masterformat_codes,
                    has_carbon_declaration, declaration_url, declaration_url_valid,
                    is_target_match, quality_score, source, contributing_sources,
                    observed_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
                ON CONFLICT(supplier_name) DO UPDATE SET
                    normalized_name = excluded.normalized_name,
                    website = excluded.website,
                    contact_email = excluded.contact_email,
                    contact_phone = excluded.contact_phone,
                    address = excluded.address,
                    headquarters_city = excluded.headquarters_city,
                    headquarters_state = excluded.headquarters_state,
                    description = excluded.description,
                    certifications = excluded.certifications,
                    masterformat_codes = excluded.masterformat_codes,
                    has_carbon_declaration = excluded.has_carbon_declaration,
                    declaration_url = excluded.declaration_url,
                    declaration_url_valid = excluded.declaration_url_valid,
                    is_target_match = excluded.is_target_match,
                    quality_score = excluded.quality_score,
                    source = excluded.source,
                    contributing_sources = excluded.contributing_sources,
                    observed_at = excluded.observed_at,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&record.supplier_name)
            .bind(&record.normalized_name)
            .bind(&record.website)
            .bind(&record.contact_email)
            .bind(&record.contact_phone)
            .bind(&record.address)
            .bind(&record.headquarters_city)
            .bind(&record.headquarters_state)
            .bind(&record.description)
            .bind(certifications)
            .bind(masterformat_codes)
            .bind(record.has_carbon_declaration)
            .bind(&record.declaration_url)
            .bind(record.declaration_url_valid)
            .bind(record.is_target_match)
            .bind(record.quality_score as i64)
            .bind(record.source.to_string())
            .bind(contributing_sources)
            .bind(record.observed_at.map(|at| at.to_rfc3339()))
            .bind(&updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(batch.len())
    }
}
