use std::collections::HashMap;
use tracing::{debug, warn};

use super::matching::SimilarityMatcher;
use super::normalizer::normalize_name;
use super::scoring::quality_score;
use super::types::{CanonicalSupplierRecord, RawSupplierRecord};
use super::TARGET_SUPPLIER;

/// What happened to one raw record fed into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsorbOutcome {
    /// The record started a new canonical entry
    Created,
    /// The record was folded into an existing entry
    Merged,
    /// The record had no usable name and was dropped
    Rejected,
}

/// Owned collection of canonical supplier records, keyed by normalized
/// name. Feed raw records through [`CanonicalStore::absorb`]; each one
/// either creates an entry, merges into the entry it resolves to, or is
/// rejected as unusable. Records are never removed, and every entry's
/// quality score is recomputed whenever the entry changes.
pub struct CanonicalStore {
    records: Vec<CanonicalSupplierRecord>,
    // Normalized key -> position in `records`
    index: HashMap<String, usize>,
    // First character of the key -> positions sharing it, in insertion
    // order. Fuzzy matching only scans the candidate's own block.
    blocks: HashMap<char, Vec<usize>>,
    matcher: SimilarityMatcher,
}

impl CanonicalStore {
    pub fn new(similarity_threshold: f64) -> Self {
        CanonicalStore {
            records: Vec::new(),
            index: HashMap::new(),
            blocks: HashMap::new(),
            matcher: SimilarityMatcher::new(similarity_threshold),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CanonicalSupplierRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [CanonicalSupplierRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<CanonicalSupplierRecord> {
        self.records
    }

    /// Resolve one raw record against the store and apply it.
    ///
    /// Resolution is exact key lookup first, then a fuzzy scan of the
    /// key's first-character block. The same input sequence always
    /// produces the same store.
    pub fn absorb(&mut self, raw: RawSupplierRecord) -> AbsorbOutcome {
        let key = normalize_name(&raw.supplier_name);
        let block_char = match key.chars().next() {
            Some(c) => c,
            None => {
                warn!(
                    target: TARGET_SUPPLIER,
                    "Skipping record with unusable supplier name {:?} from {}",
                    raw.supplier_name, raw.source
                );
                return AbsorbOutcome::Rejected;
            }
        };

        if let Some(&position) = self.index.get(&key) {
            self.merge_into(position, raw);
            return AbsorbOutcome::Merged;
        }

        let matched = self.blocks.get(&block_char).and_then(|positions| {
            self.matcher.best_match(
                &key,
                positions
                    .iter()
                    .map(|&p| (p, self.records[p].normalized_name.as_str())),
            )
        });

        match matched {
            Some(position) => {
                debug!(
                    target: TARGET_SUPPLIER,
                    "Merging '{}' into '{}' on fuzzy key match",
                    raw.supplier_name, self.records[position].supplier_name
                );
                self.merge_into(position, raw);
                AbsorbOutcome::Merged
            }
            None => {
                self.insert_new(key, block_char, raw);
                AbsorbOutcome::Created
            }
        }
    }

    fn insert_new(&mut self, key: String, block_char: char, raw: RawSupplierRecord) {
        let position = self.records.len();
        self.records.push(canonical_from_raw(key.clone(), raw));
        self.index.insert(key, position);
        self.blocks.entry(block_char).or_default().push(position);
    }

    fn merge_into(&mut self, position: usize, raw: RawSupplierRecord) {
        let record = &mut self.records[position];
        let overwrite = raw.source.outranks_for_contact();

        merge_scalar(&mut record.website, raw.website, overwrite);
        merge_scalar(&mut record.contact_email, raw.contact_email, overwrite);
        merge_scalar(&mut record.contact_phone, raw.contact_phone, overwrite);
        merge_scalar(&mut record.address, raw.address, overwrite);
        merge_scalar(
            &mut record.headquarters_city,
            raw.headquarters_city,
            overwrite,
        );
        merge_scalar(
            &mut record.headquarters_state,
            raw.headquarters_state,
            overwrite,
        );
        merge_scalar(&mut record.description, raw.description, overwrite);

        record
            .certifications
            .extend(raw.certifications.into_iter().filter_map(clean_value));
        record
            .masterformat_codes
            .extend(raw.masterformat_codes.into_iter().filter_map(clean_value));

        record.has_carbon_declaration |= raw.has_carbon_declaration;
        // First observed document URL wins; later ones are ignored.
        if record.declaration_url.is_none() {
            record.declaration_url = raw.declaration_url.and_then(clean_value);
        }
        if record.observed_at.is_none() {
            record.observed_at = raw.observed_at;
        }

        record.contributing_sources.push(raw.source);
        record.quality_score = quality_score(record);
    }
}

fn canonical_from_raw(key: String, raw: RawSupplierRecord) -> CanonicalSupplierRecord {
    let mut record = CanonicalSupplierRecord {
        supplier_name: raw.supplier_name.trim().to_string(),
        normalized_name: key,
        website: raw.website.and_then(clean_value),
        contact_email: raw.contact_email.and_then(clean_value),
        contact_phone: raw.contact_phone.and_then(clean_value),
        address: raw.address.and_then(clean_value),
        headquarters_city: raw.headquarters_city.and_then(clean_value),
        headquarters_state: raw.headquarters_state.and_then(clean_value),
        description: raw.description.and_then(clean_value),
        certifications: raw
            .certifications
            .into_iter()
            .filter_map(clean_value)
            .collect(),
        masterformat_codes: raw
            .masterformat_codes
            .into_iter()
            .filter_map(clean_value)
            .collect(),
        has_carbon_declaration: raw.has_carbon_declaration,
        declaration_url: raw.declaration_url.and_then(clean_value),
        declaration_url_valid: None,
        is_target_match: false,
        quality_score: 0,
        source: raw.source,
        observed_at: raw.observed_at,
        contributing_sources: vec![raw.source],
    };
    record.quality_score = quality_score(&record);
    record
}

/// Keep a scalar only when the incoming value is non-blank, and only
/// overwrite an existing value when the incoming source outranks.
fn merge_scalar(slot: &mut Option<String>, incoming: Option<String>, overwrite: bool) {
    if let Some(value) = incoming.and_then(clean_value) {
        if overwrite || slot.is_none() {
            *slot = Some(value);
        }
    }
}

fn clean_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
