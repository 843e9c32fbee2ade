//! Parser for the hardware-capability block of `ld.so --help`.

/// Collect the supported glibc-hwcaps subdirectory names.
///
/// The dynamic loader prints, among other sections:
/// ```text
/// Subdirectories of glibc-hwcaps directories, in priority order:
///   x86-64-v4
///   x86-64-v3 (supported, searched)
///   x86-64-v2 (supported, searched)
/// ```
/// Only entries marked supported are kept, in the printed (priority) order.
/// The block ends at the first blank or unindented line.
pub fn parse_hwcaps(output: &str) -> Vec<String> {
    let mut caps = Vec::new();
    let mut in_block = false;
    for line in output.lines() {
        if !in_block {
            in_block = line.contains("glibc-hwcaps");
            continue;
        }
        if line.trim().is_empty() || !line.starts_with(char::is_whitespace) {
            break;
        }
        let Some(name) = line.split_whitespace().next() else {
            break;
        };
        if line.contains("(supported") {
            caps.push(name.to_string());
        }
    }
    caps
}
