//! Scan coordinator.
//!
//! Expands the address spec, runs one probe + parse task per host through a
//! fixed-size pool, and joins the per-host outcomes back in expansion order.
//! A failed host contributes no records; it never fails the scan.

use crate::error::{ProbeError, ScanError, ScanResult};
use crate::scanner::parser::parse_report;
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::traits::{PortRecord, Probe, ScanMode};
use crate::scanner::{ScanReport, ScanSummary};
use crate::types::{AddressSpec, HostTarget};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Why a host contributed no records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostFailure {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("scan budget exhausted before the probe started")]
    BudgetExhausted,
}

/// Result of one host's probe + parse task.
pub type HostOutcome = Result<Vec<PortRecord>, HostFailure>;

/// Host cap applied unless configured otherwise (one /16).
pub const DEFAULT_MAX_HOSTS: u64 = 65_536;

/// Resource limits for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Maximum probes in flight at once.
    pub pool_size: usize,
    /// Per-host probe timeout.
    pub probe_timeout: Duration,
    /// Aggregate wall-clock budget for the whole scan.
    pub scan_budget: Option<Duration>,
    /// Probe launches per second, 0 for unlimited.
    pub launch_rate: u32,
    /// Reject specs expanding to more hosts than this.
    pub max_hosts: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            pool_size: 16,
            probe_timeout: Duration::from_secs(60),
            scan_budget: None,
            launch_rate: 0,
            max_hosts: Some(DEFAULT_MAX_HOSTS),
        }
    }
}

impl CoordinatorConfig {
    /// Set the pool size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Set the per-host probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the aggregate scan budget.
    pub fn with_scan_budget(mut self, budget: Duration) -> Self {
        self.scan_budget = Some(budget);
        self
    }

    /// Set the probe launch rate.
    pub fn with_launch_rate(mut self, rate: u32) -> Self {
        self.launch_rate = rate;
        self
    }

    /// Set the host cap.
    pub fn with_max_hosts(mut self, max_hosts: u64) -> Self {
        self.max_hosts = Some(max_hosts);
        self
    }

    /// Remove the host cap.
    pub fn without_max_hosts(mut self) -> Self {
        self.max_hosts = None;
        self
    }

    fn validate(&self) -> ScanResult<()> {
        if self.pool_size == 0 {
            return Err(ScanError::InvalidConfig("pool size must be at least 1".to_string()));
        }
        if self.probe_timeout.is_zero() {
            return Err(ScanError::InvalidConfig("probe timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Fans probes out across an expanded host list.
pub struct Coordinator {
    probe: Arc<dyn Probe>,
    config: CoordinatorConfig,
    limiter: Option<RateLimiter>,
    progress: Option<ProgressBar>,
}

impl Coordinator {
    /// Create a coordinator around a probe implementation.
    pub fn new(probe: Arc<dyn Probe>, config: CoordinatorConfig) -> ScanResult<Self> {
        config.validate()?;
        Ok(Self {
            probe,
            limiter: RateLimiter::per_second(config.launch_rate),
            config,
            progress: None,
        })
    }

    /// Report per-host completion on a progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The active resource limits.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Scan every host of `spec` and return the aggregated report.
    pub async fn run(&self, spec: &AddressSpec, mode: &ScanMode) -> ScanResult<ScanReport> {
        let host_count = spec.host_count();
        if let Some(limit) = self.config.max_hosts {
            if host_count > limit {
                return Err(ScanError::TooManyHosts {
                    hosts: host_count,
                    limit,
                });
            }
        }

        let started = Instant::now();
        let hosts = spec.expand();
        let ports = match mode {
            ScanMode::Specified(Some(list)) => list.port_count(),
            _ => 0,
        };
        info!(
            target = %spec,
            mode = %mode,
            hosts = hosts.len(),
            ports,
            pool = self.config.pool_size,
            "starting scan"
        );

        let outcomes = self.probe_hosts(&hosts, mode).await;
        let summary = ScanSummary::tally(&outcomes);
        let records: Vec<PortRecord> = outcomes
            .into_iter()
            .filter_map(Result::ok)
            .flatten()
            .collect();

        info!(
            records = records.len(),
            responded = summary.responded,
            timed_out = summary.timed_out,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan finished"
        );

        Ok(ScanReport {
            address: *spec,
            mode: mode.clone(),
            timestamp: Utc::now(),
            records,
            summary,
        })
    }

    /// Probe each host and return one outcome per host, in `hosts` order.
    pub async fn probe_hosts(&self, hosts: &[HostTarget], mode: &ScanMode) -> Vec<HostOutcome> {
        if let Some(pb) = &self.progress {
            pb.set_length(hosts.len() as u64);
        }

        let deadline = self.config.scan_budget.map(|budget| Instant::now() + budget);
        let mut slots: Vec<Option<HostOutcome>> = hosts.iter().map(|_| None).collect();

        // Futures are lazy, so the buffer size is the number of probes in flight.
        let mut completed = stream::iter(hosts.iter().copied().enumerate())
            .map(|(index, host)| async move { (index, self.probe_host(host, mode, deadline).await) })
            .buffer_unordered(self.config.pool_size);

        while let Some((index, outcome)) = completed.next().await {
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
            slots[index] = Some(outcome);
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(HostFailure::BudgetExhausted)))
            .collect()
    }

    async fn probe_host(
        &self,
        host: HostTarget,
        mode: &ScanMode,
        deadline: Option<Instant>,
    ) -> HostOutcome {
        if let Some(limiter) = &self.limiter {
            match deadline {
                Some(deadline) => {
                    if time::timeout_at(deadline, limiter.wait()).await.is_err() {
                        debug!(%host, "scan budget exhausted waiting for launch slot");
                        return Err(HostFailure::BudgetExhausted);
                    }
                }
                None => limiter.wait().await,
            }
        }

        // Clip against the clock as of launch, after any rate-limit wait.
        let mut timeout = self.config.probe_timeout;
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(%host, "scan budget exhausted, skipping host");
                return Err(HostFailure::BudgetExhausted);
            }
            timeout = timeout.min(remaining);
        }

        match self.probe.probe(host, mode, timeout).await {
            Ok(raw) => {
                let mut records = parse_report(&raw);
                // The probe ran but reported nothing for its target.
                if records.is_empty() {
                    records.push(PortRecord::unreachable(host));
                }
                debug!(%host, records = records.len(), "probe complete");
                Ok(records)
            }
            Err(e) => {
                warn!(%host, error = %e, "probe failed, host contributes no records");
                Err(HostFailure::Probe(e))
            }
        }
    }
}
