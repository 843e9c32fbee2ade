//! On-disk receipts and the pending report.
//!
//! The cache directory is the only state shared across invocations. A
//! receipt's presence means "already reported for this release"; its
//! contents are the bytes that were posted. Every write goes through a
//! temp file in the target directory followed by a rename.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::identity::Identity;

/// Directory under the cache root holding receipts and the pending report.
pub const REPORT_DIR: &str = "ubuntu-report";

/// File name of the single spooled undelivered report.
pub const PENDING_FILE: &str = "pending";

pub fn report_dir(cache_root: &Path) -> PathBuf {
    cache_root.join(REPORT_DIR)
}

/// `{cache_root}/ubuntu-report/{distribution}.{version}`
pub fn receipt_path(cache_root: &Path, identity: &Identity) -> PathBuf {
    report_dir(cache_root).join(format!("{}.{}", identity.distribution, identity.version))
}

/// `{cache_root}/ubuntu-report/pending`
pub fn pending_path(cache_root: &Path) -> PathBuf {
    report_dir(cache_root).join(PENDING_FILE)
}

/// Atomically write `data` to `path`, creating parent directories (0700)
/// as needed. The final file is world-readable (0644).
pub fn write_atomically(path: &Path, data: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::other("path has no parent directory"))?;
    if !dir.exists() {
        fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data.as_bytes())?;
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(0o644))?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
