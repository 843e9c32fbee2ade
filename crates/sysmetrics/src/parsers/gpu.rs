//! Parser for `lspci -n` output.

use serde::Serialize;

/// One display controller, as numeric PCI identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gpu {
    #[serde(rename = "Vendor")]
    pub vendor: String,
    #[serde(rename = "Model")]
    pub model: String,
}

/// Extract display controllers from `lspci -n`.
///
/// Expected rows look like:
/// ```text
/// 00:02.0 0300: 8086:0126 (rev 09)
/// ```
/// Display controllers carry a class code starting with `03`. Devices are
/// deduplicated while preserving first-seen order.
pub fn parse_lspci(output: &str) -> Vec<Gpu> {
    let mut gpus: Vec<Gpu> = Vec::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_slot), Some(class), Some(device)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if !class
            .strip_suffix(':')
            .is_some_and(|class| class.starts_with("03"))
        {
            continue;
        }
        let Some((vendor, model)) = device.split_once(':') else {
            continue;
        };
        if !is_hex4(vendor) || !is_hex4(model) {
            continue;
        }
        let gpu = Gpu {
            vendor: vendor.to_lowercase(),
            model: model.to_lowercase(),
        };
        if !gpus.contains(&gpu) {
            gpus.push(gpu);
        }
    }
    gpus
}

fn is_hex4(token: &str) -> bool {
    token.len() == 4 && token.chars().all(|c| c.is_ascii_hexdigit())
}
