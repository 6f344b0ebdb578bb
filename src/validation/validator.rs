use futures::future::join_all;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::{DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_DELAY};
use crate::supplier::fusion::CanonicalStore;
use crate::supplier::scoring::quality_score;
use crate::supplier::ValidationOutcome;
use crate::TARGET_WEB_REQUEST;

const PROGRESS_EVERY: usize = 50;

/// Anything that can answer "is this document URL reachable". The
/// production implementation speaks HTTP; tests script outcomes.
pub trait UrlProbe {
    fn probe(&self, url: &str) -> impl std::future::Future<Output = ValidationOutcome> + Send;
}

/// How hard validation is allowed to hit remote hosts: at most
/// `max_concurrency` requests in flight, then `delay` of quiet time
/// before the next batch.
#[derive(Debug, Clone)]
pub struct RatePolicy {
    pub max_concurrency: usize,
    pub delay: Duration,
}

impl Default for RatePolicy {
    fn default() -> Self {
        RatePolicy {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl RatePolicy {
    pub fn new(max_concurrency: usize, delay: Duration) -> Self {
        RatePolicy {
            max_concurrency: max_concurrency.max(1),
            delay,
        }
    }
}

/// Probe every declared document URL in the store and stamp each record
/// with the result. Records without a document URL are left untouched.
/// One URL's failure never affects another's verdict. Returns how many
/// URLs turned out unreachable.
pub async fn validate_store<P: UrlProbe>(
    store: &mut CanonicalStore,
    probe: &P,
    policy: &RatePolicy,
) -> usize {
    let pending: Vec<(usize, String)> = store
        .records()
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            record.declaration_url.clone().map(|url| (position, url))
        })
        .collect();

    if pending.is_empty() {
        debug!(target: TARGET_WEB_REQUEST, "No declared document URLs to validate");
        return 0;
    }

    info!(
        target: TARGET_WEB_REQUEST,
        "Validating {} declared document URLs",
        pending.len()
    );

    let mut invalid = 0;
    let mut checked = 0;
    for batch in pending.chunks(policy.max_concurrency.max(1)) {
        let outcomes = join_all(batch.iter().map(|(_, url)| probe.probe(url))).await;

        for ((position, url), outcome) in batch.iter().zip(outcomes) {
            checked += 1;
            if !outcome.reachable {
                invalid += 1;
                debug!(
                    target: TARGET_WEB_REQUEST,
                    "Document URL {} unreachable ({}): {}",
                    url,
                    outcome
                        .http_status
                        .map_or_else(|| "no status".to_string(), |s| s.to_string()),
                    outcome.error.as_deref().unwrap_or("no detail")
                );
            }

            let record = &mut store.records_mut()[*position];
            record.declaration_url_valid = Some(outcome.reachable);
            record.quality_score = quality_score(record);

            if checked % PROGRESS_EVERY == 0 {
                info!(
                    target: TARGET_WEB_REQUEST,
                    "Validated {}/{} document URLs",
                    checked,
                    pending.len()
                );
            }
        }

        if !policy.delay.is_zero() {
            sleep(policy.delay).await;
        }
    }

    info!(
        target: TARGET_WEB_REQUEST,
        "Validation complete: {} of {} document URLs unreachable",
        invalid,
        pending.len()
    );
    invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::{RawSupplierRecord, SupplierSource};
    use std::collections::HashMap;

    struct ScriptedProbe {
        outcomes: HashMap<String, ValidationOutcome>,
    }

    impl ScriptedProbe {
        fn new(entries: Vec<(&str, ValidationOutcome)>) -> Self {
            ScriptedProbe {
                outcomes: entries
                    .into_iter()
                    .map(|(url, outcome)| (url.to_string(), outcome))
                    .collect(),
            }
        }
    }

    impl UrlProbe for ScriptedProbe {
        async fn probe(&self, url: &str) -> ValidationOutcome {
            self.outcomes
                .get(url)
                .cloned()
                .unwrap_or_else(|| ValidationOutcome::failed(None, "connection refused"))
        }
    }

    fn store_with_urls(urls: Vec<Option<&str>>) -> CanonicalStore {
        // Distinct names so nothing fuzzy-merges by accident.
        const NAMES: [&str; 3] = ["Alpine Concrete", "Boreal Timber", "Cascade Glass"];
        let mut store = CanonicalStore::new(0.85);
        for (i, url) in urls.into_iter().enumerate() {
            let record = match url {
                Some(url) => RawSupplierRecord::new(NAMES[i], SupplierSource::CarbonRegistry)
                    .with_declared_document(Some(url.to_string())),
                None => RawSupplierRecord::new(NAMES[i], SupplierSource::GapList),
            };
            store.absorb(record);
        }
        store
    }

    fn quiet_policy() -> RatePolicy {
        RatePolicy::new(2, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_reachable_and_unreachable_stamped() {
        let mut store = store_with_urls(vec![
            Some("https://epd.example.com/good.pdf"),
            Some("https://epd.example.com/gone.pdf"),
            None,
        ]);
        let probe = ScriptedProbe::new(vec![
            ("https://epd.example.com/good.pdf", ValidationOutcome::ok(200)),
            (
                "https://epd.example.com/gone.pdf",
                ValidationOutcome::failed(Some(404), "status 404 Not Found"),
            ),
        ]);

        let invalid = validate_store(&mut store, &probe, &quiet_policy()).await;

        assert_eq!(invalid, 1);
        let records = store.records();
        assert_eq!(records[0].declaration_url_valid, Some(true));
        assert_eq!(records[1].declaration_url_valid, Some(false));
        // No document URL, so validation never touches it.
        assert_eq!(records[2].declaration_url_valid, None);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_poison_the_rest() {
        let mut store = store_with_urls(vec![
            Some("https://epd.example.com/error.pdf"),
            Some("https://epd.example.com/fine.pdf"),
        ]);
        // First URL is unscripted and resolves as a connection error.
        let probe = ScriptedProbe::new(vec![(
            "https://epd.example.com/fine.pdf",
            ValidationOutcome::ok(200),
        )]);

        let invalid = validate_store(&mut store, &probe, &quiet_policy()).await;

        assert_eq!(invalid, 1);
        assert_eq!(store.records()[0].declaration_url_valid, Some(false));
        assert_eq!(store.records()[1].declaration_url_valid, Some(true));
    }

    #[tokio::test]
    async fn test_validation_bonus_lands_in_score() {
        let mut store = store_with_urls(vec![Some("https://epd.example.com/good.pdf")]);
        let before = store.records()[0].quality_score;

        let probe = ScriptedProbe::new(vec![(
            "https://epd.example.com/good.pdf",
            ValidationOutcome::ok(200),
        )]);
        validate_store(&mut store, &probe, &quiet_policy()).await;

        assert_eq!(store.records()[0].quality_score, before + 10);
    }

    #[tokio::test]
    async fn test_empty_store_validates_nothing() {
        let mut store = CanonicalStore::new(0.85);
        let probe = ScriptedProbe::new(vec![]);
        assert_eq!(validate_store(&mut store, &probe, &quiet_policy()).await, 0);
    }
}
