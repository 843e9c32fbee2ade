//! External inspection commands with per-probe timeouts.
//!
//! A probe is a plain record of command and timeout so tests can substitute
//! the executable independently of the parser. Probe failures are never
//! fatal to collection: every failure mode yields an empty buffer.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Applied when a probe doesn't pick its own timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// No probe may wait longer than this, whatever the caller asked for.
pub const MAX_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// One external inspection command.
#[derive(Debug, Clone)]
pub struct Probe {
    pub name: &'static str,
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Probe {
    pub fn new(name: &'static str, program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            name,
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.min(MAX_PROBE_TIMEOUT);
        self
    }

    /// Run the command and capture stdout.
    ///
    /// Non-zero exit, signal termination, timeout and executable-not-found
    /// all collapse to an empty buffer with a log line. Stderr is discarded.
    pub async fn run(&self) -> String {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(probe = self.name, "couldn't run {}: {err}", self.program);
                return String::new();
            }
            Err(_) => {
                warn!(
                    probe = self.name,
                    timeout_secs = self.timeout.as_secs(),
                    "probe timed out"
                );
                return String::new();
            }
        };

        if !output.status.success() {
            warn!(probe = self.name, status = %output.status, "probe exited with failure");
            return String::new();
        }

        debug!(probe = self.name, bytes = output.stdout.len(), "probe completed");
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let out = Probe::new("echo", "/bin/echo", &["hello", "probe"]).run().await;
        assert_eq!(out, "hello probe\n");
    }

    #[tokio::test]
    async fn nonzero_exit_yields_empty() {
        let out = Probe::new("sh", "sh", &["-c", "echo noise; exit 1"]).run().await;
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn missing_executable_yields_empty() {
        let out = Probe::new("none", "/nonexistent/binary", &[]).run().await;
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn timeout_yields_empty() {
        let probe = Probe::new("sleep", "sleep", &["5"]).with_timeout(Duration::from_millis(50));
        let out = probe.run().await;
        assert_eq!(out, "");
    }

    #[test]
    fn timeout_is_capped() {
        let probe = Probe::new("x", "true", &[]).with_timeout(Duration::from_secs(600));
        assert_eq!(probe.timeout, MAX_PROBE_TIMEOUT);
    }
}
