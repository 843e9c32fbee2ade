//! Upgrade continuity: replay the previous release's consent decision.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache;
use crate::error::{Error, Result};
use crate::identity::Identity;

/// Compare dotted release versions numerically, falling back to plain
/// string order for non-numeric segments. A missing segment sorts first,
/// so `18.04.1` is newer than `18.04`.
pub(crate) fn cmp_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Find the most recent previous-release receipt of `identity`'s
/// distribution. Receipts of other distributions never count, whatever
/// their version says.
pub(crate) fn latest_previous_receipt(
    cache_root: &Path,
    identity: &Identity,
) -> Option<PathBuf> {
    let dir = cache::report_dir(cache_root);
    let entries = fs::read_dir(&dir).ok()?;

    let mut best: Option<(String, PathBuf)> = None;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some((distribution, version)) = name.split_once('.') else {
            continue;
        };
        if distribution != identity.distribution || version == identity.version {
            continue;
        }
        if best
            .as_ref()
            .map_or(true, |(latest, _)| cmp_versions(version, latest) == Ordering::Greater)
        {
            best = Some((version.to_string(), entry.path()));
        }
    }
    best.map(|(_, path)| path)
}

/// What an upgrade run should do, given the cache contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpgradeDecision {
    /// No previous report: a fresh install, nothing to replay.
    Nothing,
    /// The previous release opted out; carry the refusal forward.
    ReplayOptOut,
    /// The previous release reported; collect and send for this one.
    ReplayReport,
}

pub(crate) fn decide(cache_root: &Path, identity: &Identity) -> Result<UpgradeDecision> {
    let Some(previous) = latest_previous_receipt(cache_root, identity) else {
        info!(
            distribution = identity.distribution,
            "no previous report, nothing to replay"
        );
        return Ok(UpgradeDecision::Nothing);
    };
    debug!(previous = %previous.display(), "replaying consent from previous release");
    let content = fs::read_to_string(&previous)?;
    if content.trim() == crate::report::OPT_OUT_JSON {
        Ok(UpgradeDecision::ReplayOptOut)
    } else {
        Ok(UpgradeDecision::ReplayReport)
    }
}

/// Receipt gate for the upgrade entry point: reporting twice for the same
/// release is an error unless forced.
pub(crate) fn check_not_reported(
    cache_root: &Path,
    identity: &Identity,
    always_report: bool,
) -> Result<()> {
    let receipt = cache::receipt_path(cache_root, identity);
    if !always_report && receipt.exists() {
        return Err(Error::AlreadyReported(receipt));
    }
    Ok(())
}
