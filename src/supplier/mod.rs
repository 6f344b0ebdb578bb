pub mod domain;
pub mod fusion;
pub mod matching;
pub mod normalizer;
pub mod scoring;
pub mod targets;
pub mod types;

pub use types::*;

// Module-level constants
pub const TARGET_SUPPLIER: &str = "supplier";
