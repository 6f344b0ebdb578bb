use super::types::CanonicalSupplierRecord;

// Completeness weights. They sum to the cap, so a fully populated record
// with a validated document lands exactly on MAX_SCORE.
const WEBSITE_POINTS: u32 = 20;
const CARBON_DECLARATION_POINTS: u32 = 30;
const VALIDATED_DOCUMENT_POINTS: u32 = 10;
const PHONE_POINTS: u32 = 10;
const EMAIL_POINTS: u32 = 15;
const ADDRESS_POINTS: u32 = 10;
const CERTIFICATION_POINTS: u32 = 5;
const MAX_SCORE: u32 = 100;

/// Data-completeness score for a canonical record, 0 to 100. Pure
/// function of the record's current fields; callers recompute it after
/// any mutation rather than patching it incrementally.
pub fn quality_score(record: &CanonicalSupplierRecord) -> u8 {
    let mut score = 0u32;

    if record.website.is_some() {
        score += WEBSITE_POINTS;
    }
    if record.has_carbon_declaration {
        score += CARBON_DECLARATION_POINTS;
    }
    if record.declaration_url_valid == Some(true) {
        score += VALIDATED_DOCUMENT_POINTS;
    }
    if record.contact_phone.is_some() {
        score += PHONE_POINTS;
    }
    if record.contact_email.is_some() {
        score += EMAIL_POINTS;
    }
    if record.address.is_some() {
        score += ADDRESS_POINTS;
    }
    if !record.certifications.is_empty() {
        score += CERTIFICATION_POINTS;
    }

    score.min(MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::fusion::CanonicalStore;
    use crate::supplier::types::{RawSupplierRecord, SupplierSource};

    fn canonical(raw: RawSupplierRecord) -> CanonicalSupplierRecord {
        let mut store = CanonicalStore::new(0.85);
        store.absorb(raw);
        store.into_records().remove(0)
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let record = canonical(RawSupplierRecord::new("Bare Name", SupplierSource::GapList));
        assert_eq!(quality_score(&record), 0);
    }

    #[test]
    fn test_individual_weights() {
        let record = canonical(
            RawSupplierRecord::new("Acme", SupplierSource::SiteCrawl)
                .with_website("https://acme.example.com"),
        );
        assert_eq!(quality_score(&record), 20);

        let record = canonical(
            RawSupplierRecord::new("Acme", SupplierSource::CarbonRegistry)
                .with_declared_document(None),
        );
        assert_eq!(quality_score(&record), 30);

        let record = canonical(
            RawSupplierRecord::new("Acme", SupplierSource::SiteCrawl)
                .with_contact_email("a@example.com"),
        );
        assert_eq!(quality_score(&record), 15);
    }

    #[test]
    fn test_validated_document_bonus_requires_true() {
        let mut record = canonical(
            RawSupplierRecord::new("Acme", SupplierSource::CarbonRegistry)
                .with_declared_document(Some("https://epd.example.com/a.pdf".to_string())),
        );
        assert_eq!(quality_score(&record), 30);

        record.declaration_url_valid = Some(false);
        assert_eq!(quality_score(&record), 30);

        record.declaration_url_valid = Some(true);
        assert_eq!(quality_score(&record), 40);
    }

    #[test]
    fn test_full_record_hits_the_cap() {
        let mut record = canonical(
            RawSupplierRecord::new("Acme", SupplierSource::SiteCrawl)
                .with_website("https://acme.example.com")
                .with_contact_email("sales@acme.example.com")
                .with_contact_phone("555-0100")
                .with_address("1 Plant Rd")
                .with_certifications(vec!["EPD".to_string()])
                .with_declared_document(Some("https://epd.example.com/a.pdf".to_string())),
        );
        record.declaration_url_valid = Some(true);
        assert_eq!(quality_score(&record), 100);
    }
}
