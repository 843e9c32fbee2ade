//! Parser for `df` output.

use serde::Serialize;

/// Space on one local filesystem, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Partition {
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Used")]
    pub used: u64,
}

/// Extract local filesystems from plain `df` output (1K blocks).
///
/// ```text
/// Filesystem     1K-blocks      Used Available Use% Mounted on
/// /dev/sda3      479079112 143550492 311118136  32% /
/// ```
/// Only device-backed filesystems count: virtual ones (tmpfs, devtmpfs,
/// overlay) and snap loop mounts are excluded. Malformed rows are skipped.
pub fn parse_df(output: &str) -> Vec<Partition> {
    let mut partitions = Vec::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let device = fields[0];
        if !device.starts_with("/dev/") || device.starts_with("/dev/loop") {
            continue;
        }
        let (Ok(blocks), Ok(used)) = (fields[1].parse::<u64>(), fields[2].parse::<u64>()) else {
            continue;
        };
        partitions.push(Partition {
            total: blocks.saturating_mul(1024),
            used: used.saturating_mul(1024),
        });
    }
    partitions
}
