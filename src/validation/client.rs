//! HTTP client creation and request handling for document probes.

use anyhow::Result;
use reqwest::{header, StatusCode};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use super::validator::UrlProbe;
use super::VALIDATION_USER_AGENT;
use crate::supplier::ValidationOutcome;
use crate::TARGET_WEB_REQUEST;

/// Create the client used for document probing
pub fn create_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

/// Probes document URLs with a HEAD request, falling back to a ranged
/// GET for hosts that reject HEAD outright.
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(HttpProbe {
            client: create_http_client()?,
            timeout,
        })
    }

    async fn ranged_get(&self, url: &str) -> ValidationOutcome {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, VALIDATION_USER_AGENT)
            .header(header::RANGE, "bytes=0-10")
            .send();

        match timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    ValidationOutcome::ok(status.as_u16())
                } else {
                    ValidationOutcome::failed(Some(status.as_u16()), format!("status {}", status))
                }
            }
            Ok(Err(err)) => ValidationOutcome::failed(None, err.to_string()),
            Err(_) => ValidationOutcome::failed(
                None,
                format!("timed out after {} seconds", self.timeout.as_secs()),
            ),
        }
    }
}

impl UrlProbe for HttpProbe {
    async fn probe(&self, url: &str) -> ValidationOutcome {
        debug!(target: TARGET_WEB_REQUEST, "Probing document URL {}", url);

        let request = self
            .client
            .head(url)
            .header(header::USER_AGENT, VALIDATION_USER_AGENT)
            .send();

        match timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    ValidationOutcome::ok(status.as_u16())
                } else if status == StatusCode::METHOD_NOT_ALLOWED {
                    // Some document hosts reject HEAD; ask for the first
                    // few bytes instead before giving up.
                    debug!(
                        target: TARGET_WEB_REQUEST,
                        "HEAD rejected for {}, retrying with ranged GET", url
                    );
                    self.ranged_get(url).await
                } else {
                    ValidationOutcome::failed(Some(status.as_u16()), format!("status {}", status))
                }
            }
            Ok(Err(err)) => ValidationOutcome::failed(None, err.to_string()),
            Err(_) => ValidationOutcome::failed(
                None,
                format!("timed out after {} seconds", self.timeout.as_secs()),
            ),
        }
    }
}
