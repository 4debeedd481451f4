//! # netsweep - Subnet Scan Orchestrator
//!
//! netsweep drives `nmap` across an IPv4 address or CIDR block. It expands
//! the block into host addresses, probes each host in its own nmap process
//! with a bounded number of probes in flight, and parses nmap's plain-text
//! reports into flat port records.
//!
//! ## Features
//!
//! - **Three Scan Modes**: full TCP sweep, specified ports (or OS detection), quick ping
//! - **Bounded Concurrency**: fixed pool of probe slots, optional launch rate
//! - **Per-Host Isolation**: a host that times out or fails never aborts the scan
//! - **Deterministic Output**: records follow address expansion order
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use netsweep::scanner::{Coordinator, CoordinatorConfig, NmapProbe, ScanMode};
//! use netsweep::types::AddressSpec;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let spec = AddressSpec::parse("192.168.1.0/30")?;
//!     let coordinator = Coordinator::new(Arc::new(NmapProbe::new("nmap")), CoordinatorConfig::default())?;
//!
//!     let report = coordinator.run(&spec, &ScanMode::Quick).await?;
//!     for record in &report.records {
//!         println!("{} {} {}", record.host, record.port, record.state);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Address and port types with strict parsing
//! - [`scanner`] - Probe trait, nmap invoker, report parser and coordinator
//! - [`api`] - Request validation and response shaping
//! - [`config`] - Injected scanner settings
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use api::{handle_scan, ScanRequest, ScanResponse};
pub use error::{CliError, ProbeError, ScanError};
pub use scanner::{Coordinator, CoordinatorConfig, PortRecord, PortState, Probe, ScanMode, ScanReport};
pub use types::{AddressSpec, HostTarget, Port, PortList};
