//! Delivery engine: POST with retries, receipts, and the pending report.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::cache;
use crate::error::{Error, Result};
use crate::identity::Identity;

/// One POST round-trip may not take longer than this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backoff schedule for delivery attempts.
///
/// The defaults assume an installer context where the network may come up
/// much later. Tests collapse the delays to zero.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_secs(30 * 60),
            max_delay: Duration::from_secs(4 * 60 * 60),
        }
    }
}

impl RetryPolicy {
    /// Same budget, no sleeping between attempts.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Build `{base}/{distribution}/desktop/{version}` and refuse anything that
/// doesn't parse or would leave an empty path component.
pub(crate) fn report_url(base: &str, identity: &Identity) -> Result<Url> {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() || identity.distribution.is_empty() || identity.version.is_empty() {
        return Err(Error::InvalidUrl(base.to_string()));
    }
    let full = format!(
        "{trimmed}/{}/desktop/{}",
        identity.distribution, identity.version
    );
    Url::parse(&full).map_err(|_| Error::InvalidUrl(base.to_string()))
}

/// Deliver one document for one release.
///
/// The POST strictly precedes the receipt write, so the receipt always
/// holds exactly the accepted payload. When every attempt fails the
/// document is spooled as the pending report, unless a receipt for this
/// release already exists (the spool would then be stale by definition).
pub async fn send(
    document: &str,
    identity: &Identity,
    cache_root: &Path,
    always_report: bool,
    base_url: &str,
    retry: &RetryPolicy,
) -> Result<()> {
    let receipt = cache::receipt_path(cache_root, identity);
    if !always_report && receipt.exists() {
        return Err(Error::AlreadyReported(receipt));
    }

    let url = report_url(base_url, identity)?;

    let pending = cache::pending_path(cache_root);
    let resending_spool = fs::read_to_string(&pending)
        .map(|content| content == document)
        .unwrap_or(false);

    if let Err(failed_attempts) = post_with_retries(&url, document, retry).await? {
        if !pending.exists() && !receipt.exists() {
            if let Err(err) = cache::write_atomically(&pending, document) {
                warn!("couldn't spool the undelivered report: {err}");
            } else {
                info!(path = %pending.display(), "kept the undelivered report for later");
            }
        }
        return Err(Error::DeliveryFailed(failed_attempts));
    }

    cache::write_atomically(&receipt, document).map_err(Error::ReceiptWrite)?;
    if resending_spool {
        if let Err(err) = fs::remove_file(&pending) {
            warn!("couldn't remove the delivered pending report: {err}");
        }
    }
    Ok(())
}

/// POST with exponential backoff. `Ok(Ok(()))` on 2xx; `Ok(Err(n))` after
/// exhausting `n` attempts; `Err` only for client construction failures.
async fn post_with_retries(
    url: &Url,
    body: &str,
    retry: &RetryPolicy,
) -> Result<std::result::Result<(), u32>> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|err| Error::Io(std::io::Error::other(err)))?;

    let attempts = retry.attempts.max(1);
    let mut delay = retry.initial_delay;
    for attempt in 1..=attempts {
        let response = client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(%url, "report accepted");
                return Ok(Ok(()));
            }
            Ok(response) => {
                warn!(attempt, status = %response.status(), "report endpoint refused the report");
            }
            Err(err) => {
                warn!(attempt, "couldn't reach the report endpoint: {err}");
            }
        }

        if attempt < attempts {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(retry.max_delay);
        }
    }
    Ok(Err(attempts))
}
