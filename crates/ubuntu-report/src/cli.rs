//! Command-line surface.
//!
//! Keeps argument parsing separate from execution logic; the default
//! invocation (no subcommand) is the interactive flow.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Where reports go unless `--url` says otherwise.
pub const DEFAULT_BASE_URL: &str = "https://metrics.ubuntu.com";

#[derive(Parser)]
#[command(name = "ubuntu-report")]
#[command(about = "Report hardware and software configuration, at most once per release")]
#[command(version)]
pub struct Cli {
    /// Send the report even if one was already recorded for this release
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report endpoint
    #[arg(short, long, global = true, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect and print the report without sending anything
    Show,

    /// Collect and send without prompting: `yes` reports, `no` opts out
    Send {
        #[arg(value_enum)]
        answer: SendAnswer,
    },

    /// Collect, display the report, then ask before sending
    Interactive,

    /// Send the report kept on disk after an earlier failed delivery
    SendPending,

    /// Hooks for distribution tooling
    Service(ServiceArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SendAnswer {
    Yes,
    No,
}

#[derive(Args)]
pub struct ServiceArgs {
    /// Replay the previous release's consent decision after an upgrade
    #[arg(long)]
    pub upgrade: bool,
}
