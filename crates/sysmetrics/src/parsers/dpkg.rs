//! Parsers for `dpkg --print-architecture` and `dpkg --status libc6`.

/// The architecture is the first token of the output, e.g. `amd64`.
pub fn parse_architecture(output: &str) -> String {
    output
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// The libc6 version is the value of the `Version:` field of the package
/// status record.
pub fn parse_libc6_version(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Version:"))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
