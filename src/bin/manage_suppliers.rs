use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row as PrettyRow, Table};
use sqlx::Row;
use terrazzo::db::Database;
use terrazzo::supplier::normalizer::normalize_name;
use tokio::main;

#[derive(Parser)]
#[command(author, version, about = "Inspect the synced supplier database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List suppliers ordered by quality score
    List {
        /// Maximum number of suppliers to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Only show target-list matches
        #[arg(short, long)]
        targets_only: bool,
    },

    /// Show everything stored for one supplier
    Show {
        /// Supplier name (raw or normalized)
        name: String,
    },

    /// Display database-wide statistics
    Stats,
}

#[main]
async fn main() -> Result<()> {
    terrazzo::logging::configure_logging();

    let cli = Cli::parse();

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "terrazzo.db".to_string());
    let db = Database::new(&database_path)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::List {
            limit,
            targets_only,
        } => list_suppliers(&db, limit, targets_only).await?,
        Commands::Show { name } => show_supplier(&db, &name).await?,
        Commands::Stats => show_stats(&db).await?,
    }

    Ok(())
}

async fn list_suppliers(db: &Database, limit: i64, targets_only: bool) -> Result<()> {
    let query = if targets_only {
        r#"
        SELECT supplier_name, quality_score, source, website, is_target_match
        FROM suppliers
        WHERE is_target_match = 1
        ORDER BY quality_score DESC, supplier_name ASC
        LIMIT ?1
        "#
    } else {
        r#"
        SELECT supplier_name, quality_score, source, website, is_target_match
        FROM suppliers
        ORDER BY quality_score DESC, supplier_name ASC
        LIMIT ?1
        "#
    };

    let rows = sqlx::query(query).bind(limit).fetch_all(db.pool()).await?;

    if rows.is_empty() {
        println!("No suppliers found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Supplier"),
        Cell::new("Score"),
        Cell::new("Source"),
        Cell::new("Website"),
        Cell::new("Target"),
    ]));

    for row in &rows {
        let supplier_name: String = row.get("supplier_name");
        let quality_score: i64 = row.get("quality_score");
        let source: String = row.get("source");
        let website: Option<String> = row.get("website");
        let is_target_match: bool = row.get("is_target_match");

        table.add_row(PrettyRow::new(vec![
            Cell::new(&supplier_name),
            Cell::new(&quality_score.to_string()),
            Cell::new(&source),
            Cell::new(website.as_deref().unwrap_or("-")),
            Cell::new(if is_target_match { "yes" } else { "" }),
        ]));
    }

    table.printstd();
    println!("{} suppliers shown.", rows.len());
    Ok(())
}

async fn show_supplier(db: &Database, name: &str) -> Result<()> {
    let normalized = normalize_name(name);
    let row = sqlx::query(
        r#"
        SELECT supplier_name, normalized_name, website, contact_email, contact_phone,
               address, headquarters_city, headquarters_state, description,
               certifications, masterformat_codes, has_carbon_declaration,
               declaration_url, declaration_url_valid, is_target_match,
               quality_score, source, contributing_sources, observed_at, updated_at
        FROM suppliers
        WHERE supplier_name = ?1 OR normalized_name = ?2
        LIMIT 1
        "#,
    )
    .bind(name)
    .bind(&normalized)
    .fetch_optional(db.pool())
    .await?;

    let row = match row {
        Some(row) => row,
        None => {
            println!(
                "No supplier found for '{}' (normalized: '{}').",
                name, normalized
            );
            return Ok(());
        }
    };

    let certifications: String = row.get("certifications");
    let masterformat_codes: String = row.get("masterformat_codes");
    let contributing_sources: String = row.get("contributing_sources");

    let mut table = Table::new();
    let mut field = |label: &str, value: String| {
        table.add_row(PrettyRow::new(vec![Cell::new(label), Cell::new(&value)]));
    };

    let supplier_name: String = row.get("supplier_name");
    let normalized_name: String = row.get("normalized_name");
    field("Supplier", supplier_name);
    field("Normalized", normalized_name);
    field("Website", display_opt(row.get("website")));
    field("Email", display_opt(row.get("contact_email")));
    field("Phone", display_opt(row.get("contact_phone")));
    field("Address", display_opt(row.get("address")));
    field("City", display_opt(row.get("headquarters_city")));
    field("State", display_opt(row.get("headquarters_state")));
    field("Description", display_opt(row.get("description")));
    field("Certifications", display_json_list(&certifications));
    field("MasterFormat", display_json_list(&masterformat_codes));
    field(
        "Carbon declaration",
        if row.get::<bool, _>("has_carbon_declaration") {
            "yes".to_string()
        } else {
            "no".to_string()
        },
    );
    field("Document URL", display_opt(row.get("declaration_url")));
    field(
        "Document valid",
        match row.get::<Option<bool>, _>("declaration_url_valid") {
            Some(true) => "yes".to_string(),
            Some(false) => "no".to_string(),
            None => "unknown".to_string(),
        },
    );
    field(
        "Target match",
        if row.get::<bool, _>("is_target_match") {
            "yes".to_string()
        } else {
            "no".to_string()
        },
    );
    field(
        "Quality score",
        row.get::<i64, _>("quality_score").to_string(),
    );
    field("Source", row.get("source"));
    field("Contributing", display_json_list(&contributing_sources));
    field("Observed at", display_opt(row.get("observed_at")));
    field("Updated at", row.get("updated_at"));

    table.printstd();
    Ok(())
}

async fn show_stats(db: &Database) -> Result<()> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
        .fetch_one(db.pool())
        .await?;
    let targets: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE is_target_match = 1")
            .fetch_one(db.pool())
            .await?;
    let with_declaration: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE has_carbon_declaration = 1")
            .fetch_one(db.pool())
            .await?;
    let invalid_documents: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE declaration_url_valid = 0")
            .fetch_one(db.pool())
            .await?;
    let average_score: Option<f64> = sqlx::query_scalar("SELECT AVG(quality_score) FROM suppliers")
        .fetch_one(db.pool())
        .await?;

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Total suppliers"),
        Cell::new(&total.to_string()),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("Target matches"),
        Cell::new(&targets.to_string()),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("With carbon declaration"),
        Cell::new(&with_declaration.to_string()),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("Invalid document URLs"),
        Cell::new(&invalid_documents.to_string()),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new("Average quality score"),
        Cell::new(&format!("{:.1}", average_score.unwrap_or(0.0))),
    ]));

    table.printstd();
    Ok(())
}

fn display_opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn display_json_list(json: &str) -> String {
    match serde_json::from_str::<Vec<String>>(json) {
        Ok(values) if values.is_empty() => "-".to_string(),
        Ok(values) => values.join(", "),
        Err(_) => json.to_string(),
    }
}
