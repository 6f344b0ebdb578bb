use tracing::info;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS suppliers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                supplier_name TEXT NOT NULL UNIQUE,
                normalized_name TEXT NOT NULL,
                website TEXT,
                contact_email TEXT,
                contact_phone TEXT,
                address TEXT,
                headquarters_city TEXT,
                headquarters_state TEXT,
                description TEXT,
                certifications TEXT NOT NULL, -- JSON array
                masterformat_codes TEXT NOT NULL, -- JSON array
                has_carbon_declaration BOOLEAN NOT NULL,
                declaration_url TEXT,
                declaration_url_valid BOOLEAN,
                is_target_match BOOLEAN NOT NULL,
                quality_score INTEGER NOT NULL,
                source TEXT NOT NULL,
                contributing_sources TEXT NOT NULL, -- JSON array
                observed_at TEXT,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_suppliers_normalized_name ON suppliers (normalized_name);
            CREATE INDEX IF NOT EXISTS idx_suppliers_quality_score ON suppliers (quality_score);
            CREATE INDEX IF NOT EXISTS idx_suppliers_is_target_match ON suppliers (is_target_match);
            "#,
        )
        .execute(&mut *conn)
        .await?;

        info!(target: TARGET_DB, "Database schema initialized");
        Ok(())
    }
}
