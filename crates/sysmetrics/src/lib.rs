//! One-shot collection and delivery of a desktop configuration report.
//!
//! The pipeline has three stages: collection (probe external commands and
//! a few files under the OS root, assemble one canonical JSON document),
//! consent (auto, opt-out, or an interactive prompt), and delivery (POST
//! to the report endpoint, with a cached receipt per release and a single
//! pending report spooled on failure).
//!
//! Collection never touches the cache; delivery owns it. A release is
//! reported at most once unless the caller forces a resend.

pub mod cache;
pub mod collector;
pub mod consent;
pub mod error;
pub mod identity;
pub mod parsers;
pub mod probe;
pub mod report;
pub mod send;
pub mod upgrade;

use std::io::{Read, Write};

pub use collector::{env_from_map, Collector, EnvLookup, ProbeSet};
pub use consent::ConsentMode;
pub use error::{Error, Result};
pub use identity::Identity;
pub use probe::Probe;
pub use report::{Report, OPT_OUT_JSON};
pub use send::RetryPolicy;

/// Assemble and serialize the document without sending anything.
pub async fn collect(collector: &Collector) -> Result<String> {
    collector.collect().await
}

/// Assemble, resolve consent, deliver.
///
/// `stdin`/`stdout` are only exercised in [`ConsentMode::Interactive`];
/// opting out skips the probe fan-out entirely since the payload is fixed.
pub async fn collect_and_send<R: Read, W: Write>(
    collector: &Collector,
    mode: ConsentMode,
    always_report: bool,
    base_url: &str,
    retry: &RetryPolicy,
    stdin: R,
    stdout: &mut W,
) -> Result<()> {
    let identity = collector.identity()?;
    let payload = match mode {
        ConsentMode::OptOut => OPT_OUT_JSON.to_string(),
        _ => {
            let document = collector.collect().await?;
            consent::resolve(mode, &document, stdin, stdout)?
        }
    };
    send::send(
        &payload,
        &identity,
        &collector.cache_root(),
        always_report,
        base_url,
        retry,
    )
    .await
}

/// Re-send the pending report left by an earlier failed delivery.
/// Succeeding removes the spool; there is nothing to collect here.
pub async fn send_pending_report(
    collector: &Collector,
    always_report: bool,
    base_url: &str,
    retry: &RetryPolicy,
) -> Result<()> {
    let identity = collector.identity()?;
    let cache_root = collector.cache_root();
    let pending = cache::pending_path(&cache_root);
    let document = std::fs::read_to_string(&pending).map_err(|_| Error::NoPendingReport)?;
    send::send(
        &document,
        &identity,
        &cache_root,
        always_report,
        base_url,
        retry,
    )
    .await
}

/// Carry the previous release's consent decision over to this one.
///
/// A fresh install (no receipt for this distribution at all) does nothing.
/// A previous opt-out is replayed verbatim; a previous report triggers a
/// fresh automatic collection for the new release.
pub async fn collect_and_send_on_upgrade(
    collector: &Collector,
    always_report: bool,
    base_url: &str,
    retry: &RetryPolicy,
) -> Result<()> {
    let identity = collector.identity()?;
    let cache_root = collector.cache_root();
    upgrade::check_not_reported(&cache_root, &identity, always_report)?;

    let payload = match upgrade::decide(&cache_root, &identity)? {
        upgrade::UpgradeDecision::Nothing => return Ok(()),
        upgrade::UpgradeDecision::ReplayOptOut => OPT_OUT_JSON.to_string(),
        upgrade::UpgradeDecision::ReplayReport => collector.collect().await?,
    };
    send::send(
        &payload,
        &identity,
        &cache_root,
        always_report,
        base_url,
        retry,
    )
    .await
}
