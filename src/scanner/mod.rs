//! Scanner module - orchestrates per-host nmap probes.
//!
//! The pipeline per host is probe (`nmap`) then parse (`parser`); the
//! `coordinator` runs that pipeline across a subnet under a bounded pool and
//! aggregates the records into a `ScanReport`.

pub mod coordinator;
pub mod nmap;
pub mod parser;
pub mod rate_limiter;
pub mod traits;

use crate::types::AddressSpec;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use coordinator::{Coordinator, CoordinatorConfig, HostFailure, HostOutcome, DEFAULT_MAX_HOSTS};
pub use nmap::{FullSweep, NmapProbe};
pub use parser::{parse_report, ReportParser};
pub use traits::{PortRecord, PortState, Probe, ScanKind, ScanMode};

/// Per-host outcome counts for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Hosts in the expanded target.
    pub hosts: usize,
    /// Hosts whose probe completed.
    pub responded: usize,
    pub timed_out: usize,
    /// Hosts whose probe failed for any reason other than a timeout.
    pub failed: usize,
    /// Hosts never probed because the scan budget ran out.
    pub skipped: usize,
    pub open_ports: usize,
}

impl ScanSummary {
    /// Count outcomes by kind.
    pub fn tally(outcomes: &[HostOutcome]) -> Self {
        let mut summary = Self {
            hosts: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                Ok(records) => {
                    summary.responded += 1;
                    summary.open_ports += records.iter().filter(|r| r.is_open()).count();
                }
                Err(HostFailure::Probe(e)) if e.is_timeout() => summary.timed_out += 1,
                Err(HostFailure::Probe(_)) => summary.failed += 1,
                Err(HostFailure::BudgetExhausted) => summary.skipped += 1,
            }
        }

        summary
    }
}

/// Complete scan results.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub address: AddressSpec,
    pub mode: ScanMode,
    /// When the scan completed.
    pub timestamp: DateTime<Utc>,
    /// Records in host-expansion order.
    pub records: Vec<PortRecord>,
    pub summary: ScanSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::types::HostTarget;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    #[test]
    fn test_summary_tally() {
        let host = HostTarget::new(Ipv4Addr::new(10, 0, 0, 1));
        let outcomes: Vec<HostOutcome> = vec![
            Ok(vec![PortRecord::unreachable(host)]),
            Err(HostFailure::Probe(ProbeError::Timeout {
                host: host.ip(),
                timeout: Duration::from_secs(1),
            })),
            Err(HostFailure::Probe(ProbeError::Execution {
                host: host.ip(),
                reason: "exit status 2".to_string(),
            })),
            Err(HostFailure::BudgetExhausted),
        ];

        let summary = ScanSummary::tally(&outcomes);
        assert_eq!(
            summary,
            ScanSummary {
                hosts: 4,
                responded: 1,
                timed_out: 1,
                failed: 1,
                skipped: 1,
                open_ports: 0,
            }
        );
    }
}
