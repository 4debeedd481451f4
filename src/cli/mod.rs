//! CLI subcommand definitions and handlers.
//!
//! - `netsweep scan <address>` - Scan an address or CIDR block
//! - `netsweep config show|init|path` - Manage the settings file

mod config;
mod scan;

pub use config::ConfigCommand;
pub use scan::ScanCommand;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// netsweep - subnet scan orchestrator built on nmap.
///
/// Expands an address or CIDR block, runs one nmap probe per host with a
/// bounded number of probes in flight, and prints the parsed port records
/// as JSON.
#[derive(Parser, Debug)]
#[command(name = "netsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bounded-concurrency nmap subnet scanner", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (info logs and a progress bar)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, global = true, value_name = "PATH", env = "NETSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan an address or CIDR block
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Manage the settings file
    #[command(alias = "c")]
    Config(ConfigCommand),
}
