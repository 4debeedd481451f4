//! netsweep - Subnet scan orchestrator built on nmap.

use anyhow::Context;
use clap::Parser;
use netsweep::cli::{Cli, Commands};
use netsweep::error::CliError;
use netsweep::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let reported = e.downcast_ref::<CliError>().is_some_and(CliError::is_reported);
            if !reported {
                output::print_error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Scan(cmd) => cmd
            .execute(config, cli.verbose, cli.quiet)
            .await
            .with_context(|| format!("scan of {} failed", cmd.address)),
        Commands::Config(cmd) => cmd.execute(config, cli.quiet).context("config command failed"),
    }
}

/// Logs go to stderr; stdout carries only the response JSON.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
