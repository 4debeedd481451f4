//! Scan subcommand implementation.
//!
//! Handles the `netsweep scan <address>` command.

use crate::api::{ErrorResponse, ScanRequest, ScanResponse};
use crate::config::ScannerSettings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::{Coordinator, ScanKind};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Scan an address or CIDR block.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IPv4 address or CIDR block)
    ///
    /// Examples:
    ///   192.168.1.1        Single address
    ///   192.168.1.0/24     CIDR block
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Scan mode
    #[arg(short, long, value_enum, default_value = "quick")]
    pub mode: ScanKind,

    /// Ports for `specified` mode (e.g., "80", "80,443", "8000-8100")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Maximum number of probes in flight
    #[arg(long)]
    pub pool: Option<usize>,

    /// Per-host probe timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Aggregate scan budget in milliseconds
    #[arg(long)]
    pub budget: Option<u64>,

    /// Probe launches per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub launch_rate: Option<u32>,

    /// Path to the nmap binary
    #[arg(long, value_name = "PATH", env = "NETSWEEP_NMAP")]
    pub probe_binary: Option<PathBuf>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, config: Option<&Path>, verbose: bool, quiet: bool) -> CliResult<()> {
        let settings = self.settings(config)?;
        let pretty = !self.compact;

        let request = ScanRequest {
            address: self.address.clone(),
            mode: self.mode.as_str().to_string(),
            port: self.ports.clone(),
        };

        let (spec, mode) = match request.validate() {
            Ok(parts) => parts,
            Err(e) => {
                output::print_error_response(&ErrorResponse::from(&e), pretty)?;
                return Err(CliError::Rejected(e));
            }
        };

        if mode.needs_privileges() && !is_root() && !quiet {
            output::print_warning("OS detection (-O) requires root/sudo privileges.");
            output::print_info("Set probe_binary to \"sudo\" with probe_prefix_args [\"-n\", \"nmap\"], or run as root.");
        }

        let probe = settings.probe();
        info!(binary = %probe.binary().display(), "using probe binary");
        let mut coordinator = Coordinator::new(Arc::new(probe), settings.coordinator_config())?;

        if !quiet {
            output::print_scan_header(&spec, &mode, coordinator.config().pool_size);
        }
        if verbose {
            coordinator = coordinator.with_progress(progress_bar());
        }

        let report = match coordinator.run(&spec, &mode).await {
            Ok(report) => report,
            Err(e) => {
                output::print_error_response(&ErrorResponse::from(&e), pretty)?;
                return Err(CliError::Rejected(e));
            }
        };

        if !quiet {
            output::print_summary(&report.summary);
        }

        output::print_response(&ScanResponse::from(report), pretty)?;
        Ok(())
    }

    /// Settings file values with command-line overrides applied.
    fn settings(&self, config: Option<&Path>) -> CliResult<ScannerSettings> {
        let mut settings = ScannerSettings::load(config)?;

        if let Some(pool) = self.pool {
            settings.pool_size = pool;
        }
        if let Some(timeout) = self.timeout {
            settings.probe_timeout_ms = timeout;
        }
        if let Some(budget) = self.budget {
            settings.scan_budget_ms = budget;
        }
        if let Some(rate) = self.launch_rate {
            settings.launch_rate = rate;
        }
        if let Some(binary) = &self.probe_binary {
            settings.probe_binary = binary.clone();
        }

        settings.validate().map_err(CliError::from)?;
        Ok(settings)
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hosts ({percent}%)")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Check if running with root privileges.
fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
