use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where a raw supplier observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierSource {
    SiteCrawl,
    CarbonRegistry,
    GapList,
}

impl SupplierSource {
    /// Site crawls observe contact details first-hand, so their scalar
    /// fields overwrite whatever a registry or gap row contributed.
    pub fn outranks_for_contact(&self) -> bool {
        matches!(self, SupplierSource::SiteCrawl)
    }
}

impl fmt::Display for SupplierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierSource::SiteCrawl => write!(f, "site_crawl"),
            SupplierSource::CarbonRegistry => write!(f, "carbon_registry"),
            SupplierSource::GapList => write!(f, "gap_list"),
        }
    }
}

/// One supplier observation as loaded from a source file, before any
/// normalization or merging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSupplierRecord {
    pub supplier_name: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub headquarters_city: Option<String>,
    pub headquarters_state: Option<String>,
    pub description: Option<String>,
    pub certifications: Vec<String>,
    pub masterformat_codes: Vec<String>,
    pub has_carbon_declaration: bool,
    pub declaration_url: Option<String>,
    pub source: SupplierSource,
    pub observed_at: Option<DateTime<Utc>>,
}

impl RawSupplierRecord {
    pub fn new(supplier_name: &str, source: SupplierSource) -> Self {
        RawSupplierRecord {
            supplier_name: supplier_name.to_string(),
            website: None,
            contact_email: None,
            contact_phone: None,
            address: None,
            headquarters_city: None,
            headquarters_state: None,
            description: None,
            certifications: Vec::new(),
            masterformat_codes: Vec::new(),
            has_carbon_declaration: false,
            declaration_url: None,
            source,
            observed_at: None,
        }
    }

    pub fn with_website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    pub fn with_contact_email(mut self, email: &str) -> Self {
        self.contact_email = Some(email.to_string());
        self
    }

    pub fn with_contact_phone(mut self, phone: &str) -> Self {
        self.contact_phone = Some(phone.to_string());
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_certifications(mut self, certifications: Vec<String>) -> Self {
        self.certifications = certifications;
        self
    }

    pub fn with_masterformat_codes(mut self, codes: Vec<String>) -> Self {
        self.masterformat_codes = codes;
        self
    }

    /// Mark the record as carrying a carbon declaration, optionally with
    /// the document URL backing it.
    pub fn with_declared_document(mut self, url: Option<String>) -> Self {
        self.has_carbon_declaration = true;
        self.declaration_url = url;
        self
    }

    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// The fused, deduplicated view of one supplier across every source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSupplierRecord {
    // Display name from the record that created this entry
    pub supplier_name: String,

    // Normalized form used as the dedupe key
    pub normalized_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters_city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Sets stay sorted so serialized output is deterministic
    pub certifications: BTreeSet<String>,
    pub masterformat_codes: BTreeSet<String>,

    pub has_carbon_declaration: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_url: Option<String>,

    // None until validation runs; never guessed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_url_valid: Option<bool>,

    pub is_target_match: bool,
    pub quality_score: u8,

    // Source of the record that created this entry
    pub source: SupplierSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,

    // Every source that contributed an observation, in merge order
    pub contributing_sources: Vec<SupplierSource>,
}

/// Outcome of probing one document URL
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub reachable: bool,
    pub http_status: Option<u16>,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok(http_status: u16) -> Self {
        ValidationOutcome {
            reachable: true,
            http_status: Some(http_status),
            error: None,
        }
    }

    pub fn failed(http_status: Option<u16>, error: impl Into<String>) -> Self {
        ValidationOutcome {
            reachable: false,
            http_status,
            error: Some(error.into()),
        }
    }
}
