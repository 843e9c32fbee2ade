//! Error kinds for the collection, consent and delivery pipeline.
//!
//! Individual probe failures are not represented here: a probe that cannot
//! run simply contributes an empty field and a `warn!` log line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can make an invocation exit non-zero.
#[derive(Debug, Error)]
pub enum Error {
    /// `etc/os-release` is missing, unreadable, or lacks ID/VERSION_ID.
    #[error("couldn't resolve distribution and version from os-release")]
    IdentityMissing,

    /// A receipt for this release already exists and force wasn't set.
    #[error("a report has already been sent for this release: {}", .0.display())]
    AlreadyReported(PathBuf),

    /// The endpoint doesn't parse to a usable URL.
    #[error("invalid report endpoint: {0}")]
    InvalidUrl(String),

    /// Every POST attempt was refused or unreachable. A pending report is
    /// kept on disk for a later `send-pending`.
    #[error("couldn't deliver the report after {0} attempt(s), kept it for later")]
    DeliveryFailed(u32),

    /// The server accepted the report but the receipt couldn't be written.
    #[error("report was delivered but its receipt couldn't be saved: {0}")]
    ReceiptWrite(#[source] io::Error),

    /// The user quit the interactive prompt. Maps to a clean exit.
    #[error("report aborted on user request")]
    AbortedByUser,

    /// `send-pending` was invoked with no pending report on disk.
    #[error("no pending report to send")]
    NoPendingReport,

    /// Serializing the assembled document failed.
    #[error("couldn't serialize the report document: {0}")]
    Assembler(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
