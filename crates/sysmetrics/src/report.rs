//! The canonical report document and its file-backed fields.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::parsers::{Cpu, Gpu, Partition, Screen};

/// Fixed document sent in place of a report when consent is declined.
pub const OPT_OUT_JSON: &str = r#"{"OptOut": true}"#;

/// Machine vendor identification from DMI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Oem {
    #[serde(rename = "Vendor")]
    pub vendor: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Family")]
    pub family: String,
}

/// Firmware identification from DMI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bios {
    #[serde(rename = "Vendor")]
    pub vendor: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// Desktop session identification from the XDG environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(rename = "DE")]
    pub de: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub session_type: String,
}

/// The assembled document.
///
/// Field declaration order is the wire order: serde_json serializes struct
/// fields in order, so two collections on an unchanged host produce
/// byte-equal output.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "OEM")]
    pub oem: Oem,
    #[serde(rename = "BIOS")]
    pub bios: Bios,
    #[serde(rename = "CPU")]
    pub cpu: Cpu,
    #[serde(rename = "GPU")]
    pub gpu: Vec<Gpu>,
    #[serde(rename = "Screens")]
    pub screens: Vec<Screen>,
    #[serde(rename = "Partitions")]
    pub partitions: Vec<Partition>,
    #[serde(rename = "Architecture")]
    pub architecture: String,
    #[serde(rename = "Libc6")]
    pub libc6: String,
    #[serde(rename = "HwCap")]
    pub hwcap: Vec<String>,
    #[serde(rename = "Autologin")]
    pub autologin: bool,
    #[serde(rename = "LivePatch")]
    pub livepatch: bool,
    #[serde(rename = "Session")]
    pub session: Session,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Timezone")]
    pub timezone: String,
}

fn read_trimmed(path: &Path) -> String {
    fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// OEM and firmware identification from `{root}/sys/class/dmi/id/`.
pub(crate) fn read_dmi(root: &Path) -> (Oem, Bios) {
    let dmi = root.join("sys/class/dmi/id");
    let oem = Oem {
        vendor: read_trimmed(&dmi.join("sys_vendor")),
        product: read_trimmed(&dmi.join("product_name")),
        family: read_trimmed(&dmi.join("product_family")),
    };
    let bios = Bios {
        vendor: read_trimmed(&dmi.join("bios_vendor")),
        version: read_trimmed(&dmi.join("bios_version")),
    };
    (oem, bios)
}

/// True when gdm is configured to log a user in automatically.
///
/// Looks for `AutomaticLoginEnable = true` in the `[daemon]` section of
/// `{root}/etc/gdm3/custom.conf`.
pub(crate) fn read_autologin(root: &Path) -> bool {
    let Ok(content) = fs::read_to_string(root.join("etc/gdm3/custom.conf")) else {
        return false;
    };
    let mut in_daemon = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_daemon = line.eq_ignore_ascii_case("[daemon]");
            continue;
        }
        if !in_daemon {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "AutomaticLoginEnable" {
                return value.trim().eq_ignore_ascii_case("true");
            }
        }
    }
    false
}

/// True when the machine is enrolled with the livepatch service, signalled
/// by the presence of its machine token.
pub(crate) fn read_livepatch(root: &Path) -> bool {
    root.join("var/snap/canonical-livepatch/common/machine-token")
        .exists()
}

/// Host timezone name, from `{root}/etc/timezone`.
pub(crate) fn read_timezone(root: &Path) -> String {
    read_trimmed(&root.join("etc/timezone"))
}

/// Reduce the locale environment to a plain language tag.
///
/// `LANGUAGE` wins (first entry of its colon list), `LANG` is the fallback;
/// either way the charset suffix is dropped: `fr_FR.UTF-8` reports `fr_FR`.
pub(crate) fn language(language_var: Option<String>, lang_var: Option<String>) -> String {
    let raw = language_var
        .filter(|value| !value.is_empty())
        .map(|value| value.split(':').next().unwrap_or_default().to_string())
        .or(lang_var)
        .unwrap_or_default();
    raw.split('.').next().unwrap_or_default().to_string()
}
