pub mod client;
pub mod validator;

pub use client::HttpProbe;
pub use validator::{validate_store, RatePolicy, UrlProbe};

// Module-level constants
pub const VALIDATION_USER_AGENT: &str = "terrazzo-verifier/1.0";
