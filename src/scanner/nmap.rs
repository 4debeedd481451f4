//! nmap probe implementation.
//!
//! Runs one nmap process per host. The argument list is built from the scan
//! mode and passed straight to the process (no shell), with the host as a
//! single argv element.

use crate::error::ProbeError;
use crate::scanner::traits::{Probe, ScanMode};
use crate::types::HostTarget;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Timing knobs for the exhaustive (`all`) sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullSweep {
    /// Minimum packets per second.
    pub min_rate: u32,
    /// Probe retransmissions per port.
    pub max_retries: u32,
    pub initial_rtt_timeout_ms: u64,
    pub max_rtt_timeout_ms: u64,
    /// nmap's own per-host ceiling.
    pub host_timeout_secs: u64,
}

impl Default for FullSweep {
    fn default() -> Self {
        Self {
            min_rate: 5000,
            max_retries: 1,
            initial_rtt_timeout_ms: 100,
            max_rtt_timeout_ms: 300,
            host_timeout_secs: 120,
        }
    }
}

/// Build the nmap argument list for one host.
pub fn probe_args(host: HostTarget, mode: &ScanMode, sweep: &FullSweep) -> Vec<String> {
    let mut args: Vec<String> = match mode {
        ScanMode::Full => vec![
            "-p-".into(),
            "-Pn".into(),
            "-n".into(),
            "-T4".into(),
            "--min-rate".into(),
            sweep.min_rate.to_string(),
            "--max-retries".into(),
            sweep.max_retries.to_string(),
            "--initial-rtt-timeout".into(),
            format!("{}ms", sweep.initial_rtt_timeout_ms),
            "--max-rtt-timeout".into(),
            format!("{}ms", sweep.max_rtt_timeout_ms),
            "--host-timeout".into(),
            format!("{}s", sweep.host_timeout_secs),
        ],
        ScanMode::Specified(Some(ports)) => vec![
            "-p".into(),
            ports.to_string(),
            "-Pn".into(),
            "-n".into(),
            "-T4".into(),
        ],
        ScanMode::Specified(None) => vec!["-O".into()],
        ScanMode::Quick => vec!["-sn".into(), "-T4".into()],
    };
    args.push(host.to_string());
    args
}

/// Probe that runs an nmap binary.
///
/// `prefix_args` go before the nmap arguments, so a launcher such as
/// `sudo -n nmap` can be configured as binary `sudo` with prefix `-n nmap`.
#[derive(Debug, Clone)]
pub struct NmapProbe {
    binary: PathBuf,
    prefix_args: Vec<String>,
    sweep: FullSweep,
}

impl NmapProbe {
    /// Create a probe using the given nmap binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            prefix_args: Vec::new(),
            sweep: FullSweep::default(),
        }
    }

    /// Arguments placed before the generated nmap arguments.
    pub fn with_prefix_args(mut self, args: Vec<String>) -> Self {
        self.prefix_args = args;
        self
    }

    /// Override the full sweep timing.
    pub fn with_full_sweep(mut self, sweep: FullSweep) -> Self {
        self.sweep = sweep;
        self
    }

    /// Path of the binary this probe runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl Probe for NmapProbe {
    async fn probe(
        &self,
        host: HostTarget,
        mode: &ScanMode,
        limit: Duration,
    ) -> Result<String, ProbeError> {
        let args = probe_args(host, mode, &self.sweep);
        debug!(binary = %self.binary.display(), args = ?args, "spawning probe");

        let child = Command::new(&self.binary)
            .args(&self.prefix_args)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout kills the process.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::Execution {
                host: host.ip(),
                reason: format!("failed to spawn {}: {}", self.binary.display(), e),
            })?;

        let output = match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProbeError::Execution {
                    host: host.ip(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ProbeError::Timeout {
                    host: host.ip(),
                    timeout: limit,
                })
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(%host, stderr = %stderr.trim(), "probe wrote to stderr");
        }

        if !output.status.success() {
            return Err(ProbeError::Execution {
                host: host.ip(),
                reason: format!("nmap exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::ScanKind;
    use std::net::Ipv4Addr;

    fn host() -> HostTarget {
        HostTarget::new(Ipv4Addr::new(192, 168, 1, 20))
    }

    #[test]
    fn test_full_sweep_args() {
        let args = probe_args(host(), &ScanMode::Full, &FullSweep::default());
        assert_eq!(
            args.join(" "),
            "-p- -Pn -n -T4 --min-rate 5000 --max-retries 1 --initial-rtt-timeout 100ms \
             --max-rtt-timeout 300ms --host-timeout 120s 192.168.1.20"
        );
    }

    #[test]
    fn test_specified_args() {
        let mode = ScanMode::from_parts(ScanKind::Specified, Some("80,8000-8100")).unwrap();
        let args = probe_args(host(), &mode, &FullSweep::default());
        assert_eq!(args, ["-p", "80,8000-8100", "-Pn", "-n", "-T4", "192.168.1.20"]);

        let args = probe_args(host(), &ScanMode::Specified(None), &FullSweep::default());
        assert_eq!(args, ["-O", "192.168.1.20"]);
    }

    #[test]
    fn test_quick_args() {
        let args = probe_args(host(), &ScanMode::Quick, &FullSweep::default());
        assert_eq!(args, ["-sn", "-T4", "192.168.1.20"]);
    }

    #[test]
    fn test_host_is_last_and_single() {
        for mode in [ScanMode::Full, ScanMode::Quick, ScanMode::Specified(None)] {
            let args = probe_args(host(), &mode, &FullSweep::default());
            assert_eq!(args.last().map(String::as_str), Some("192.168.1.20"));
            assert_eq!(args.iter().filter(|a| a.as_str() == "192.168.1.20").count(), 1);
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_execution_error() {
        let probe = NmapProbe::new("/nonexistent/netsweep-test-nmap");
        let result = probe
            .probe(host(), &ScanMode::Quick, Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(ProbeError::Execution { .. })));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> NmapProbe {
        // nmap arguments land in $1.. after the script name.
        NmapProbe::new("/bin/sh").with_prefix_args(vec![
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ])
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_process_times_out() {
        let result = shell("sleep 5")
            .probe(host(), &ScanMode::Quick, Duration::from_millis(100))
            .await;
        assert!(matches!(result, Err(ProbeError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_captured_despite_stderr() {
        let out = shell("echo \"Nmap scan report for $3\"; echo warning >&2")
            .probe(host(), &ScanMode::Quick, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out.trim(), "Nmap scan report for 192.168.1.20");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_execution_error() {
        let result = shell("echo partial; exit 1")
            .probe(host(), &ScanMode::Quick, Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(ProbeError::Execution { .. })));
    }
}
