// Re-export the Database struct and other public items
pub mod core;
mod schema;
pub mod supplier;

// Re-export Database and essential traits
pub use self::core::Database;
pub use self::supplier::SinkOutcome;
pub use sqlx::Row;
