//! ubuntu-report: one-shot system configuration reporting.

mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{Cli, Commands, SendAnswer};
use sysmetrics::{Collector, ConsentMode, Error, RetryPolicy};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        // quitting the prompt is a decision, not a failure
        Err(err) if matches!(err.downcast_ref(), Some(Error::AbortedByUser)) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("ubuntu_report={default},sysmetrics={default}")),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let collector = Collector::new();
    let retry = RetryPolicy::default();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Show => {
            let document = sysmetrics::collect(&collector).await?;
            println!("{document}");
        }
        Commands::Send { answer } => {
            let mode = match answer {
                SendAnswer::Yes => ConsentMode::Auto,
                SendAnswer::No => ConsentMode::OptOut,
            };
            sysmetrics::collect_and_send(
                &collector,
                mode,
                cli.force,
                &cli.url,
                &retry,
                io::stdin().lock(),
                &mut io::stdout(),
            )
            .await?;
        }
        Commands::Interactive => {
            sysmetrics::collect_and_send(
                &collector,
                ConsentMode::Interactive,
                cli.force,
                &cli.url,
                &retry,
                io::stdin().lock(),
                &mut io::stdout(),
            )
            .await?;
        }
        Commands::SendPending => {
            sysmetrics::send_pending_report(&collector, cli.force, &cli.url, &retry).await?;
        }
        Commands::Service(service) => {
            if !service.upgrade {
                anyhow::bail!("service currently only supports --upgrade");
            }
            sysmetrics::collect_and_send_on_upgrade(&collector, cli.force, &cli.url, &retry)
                .await?;
        }
    }
    Ok(())
}
