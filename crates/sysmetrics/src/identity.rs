//! Release identity: which distribution and version this host runs.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// The (distribution, version) pair naming one release of one distribution.
///
/// Both values are mandatory. This is the only piece of collection whose
/// failure aborts the whole pipeline: every delivery path needs it to build
/// the endpoint URL and the receipt file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub distribution: String,
    pub version: String,
}

impl Identity {
    /// Read `ID=` and `VERSION_ID=` from `{root}/etc/os-release`.
    pub fn from_os_release(root: &Path) -> Result<Self> {
        let path = root.join("etc/os-release");
        let content = fs::read_to_string(&path).map_err(|_| Error::IdentityMissing)?;

        let mut distribution = None;
        let mut version = None;
        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("ID=") {
                distribution = non_empty(value);
            } else if let Some(value) = line.strip_prefix("VERSION_ID=") {
                version = non_empty(value);
            }
        }

        match (distribution, version) {
            (Some(distribution), Some(version)) => Ok(Self { distribution, version }),
            _ => Err(Error::IdentityMissing),
        }
    }
}

/// os-release values may be quoted; an empty value counts as absent.
fn non_empty(raw: &str) -> Option<String> {
    let value = raw.trim().trim_matches('"').trim();
    (!value.is_empty()).then(|| value.to_string())
}
