//! Probe output parsers.
//!
//! Each parser maps one raw stdout buffer to a normalized document field.
//! Malformed input means "no data": rows that can't be read are skipped,
//! and an empty buffer yields an empty field. Parsers never panic and never
//! fail collection.

pub mod cpu;
pub mod dpkg;
pub mod gpu;
pub mod hwcap;
pub mod partitions;
pub mod screens;

pub use cpu::{parse_lscpu, Cpu};
pub use dpkg::{parse_architecture, parse_libc6_version};
pub use gpu::{parse_lspci, Gpu};
pub use hwcap::parse_hwcaps;
pub use partitions::{parse_df, Partition};
pub use screens::{parse_xrandr, Screen};
