//! Human-readable status lines on stderr.

use crate::scanner::{ScanMode, ScanSummary};
use crate::types::AddressSpec;
use console::style;

/// Print a scan header before scanning begins.
pub fn print_scan_header(spec: &AddressSpec, mode: &ScanMode, pool_size: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("netsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Mode: {}", style("•").dim(), style(mode).yellow());
    if let ScanMode::Specified(Some(ports)) = mode {
        eprintln!(
            "{} Ports: {} per host",
            style("•").dim(),
            style(ports.port_count()).white().bold()
        );
    }
    if spec.is_cidr() {
        eprintln!(
            "{} Target: {} ({} hosts)",
            style("•").dim(),
            style(spec).white().bold(),
            spec.host_count()
        );
    } else {
        eprintln!("{} Target: {}", style("•").dim(), style(spec).white().bold());
    }
    eprintln!(
        "{} Running up to {} probes at once...",
        style("•").dim(),
        style(pool_size).white().bold()
    );
    eprintln!();
}

/// Print per-host outcome counts after a scan.
pub fn print_summary(summary: &ScanSummary) {
    eprintln!(
        "{} {} hosts: {} responded, {} timed out, {} failed, {} skipped; {} open ports",
        style("Done:").green().bold(),
        summary.hosts,
        style(summary.responded).green(),
        style(summary.timed_out).yellow(),
        style(summary.failed).red(),
        style(summary.skipped).dim(),
        style(summary.open_ports).green().bold()
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an informational message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("Info:").blue().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}
