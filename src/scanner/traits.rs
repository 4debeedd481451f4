//! Scan records, scan modes and the `Probe` abstraction.
//!
//! The `Probe` trait is the seam between the coordinator and whatever runs
//! the external tool, enabling stub probes in tests.

use crate::error::{ProbeError, ScanError};
use crate::types::{HostTarget, Port, PortList};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Wire value of the sentinel state.
pub const UNREACHABLE_STATE: &str = "No open ports or Host unreachable";

/// Placeholder used for the port and service of a sentinel record.
pub const NO_VALUE: &str = "-";

/// State of a reported port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Port is open (service listening).
    Open,
    /// Port is closed (host answered, nothing listening).
    Closed,
    /// Port is filtered (no response, possibly by firewall).
    Filtered,
    /// Sentinel: the host produced no port data.
    #[serde(rename = "No open ports or Host unreachable")]
    Unreachable,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Unreachable => write!(f, "{}", UNREACHABLE_STATE),
        }
    }
}

impl FromStr for PortState {
    type Err = String;

    /// Only states that appear on a probe's port line parse; the sentinel
    /// is never read from probe output.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "filtered" => Ok(Self::Filtered),
            _ => Err(format!("unknown port state: {}", s)),
        }
    }
}

/// One row of scan output: a port on a host, or a host's sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecord {
    pub host: HostTarget,
    pub port: String,
    pub state: PortState,
    pub service: String,
}

impl PortRecord {
    /// Create a record for a reported port.
    pub fn new(host: HostTarget, port: Port, state: PortState, service: impl Into<String>) -> Self {
        Self {
            host,
            port: port.to_string(),
            state,
            service: service.into(),
        }
    }

    /// Create the sentinel record for a host with no port data.
    pub fn unreachable(host: HostTarget) -> Self {
        Self {
            host,
            port: NO_VALUE.to_string(),
            state: PortState::Unreachable,
            service: NO_VALUE.to_string(),
        }
    }

    /// Check if this is a sentinel record.
    pub fn is_sentinel(&self) -> bool {
        self.state == PortState::Unreachable
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// Scan mode names as accepted on the request surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanKind {
    /// Sweep every TCP port, skipping host discovery.
    All,
    /// Sweep the given ports, or run OS/service detection when none are given.
    Specified,
    /// Host discovery only.
    Quick,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Specified => "specified",
            Self::Quick => "quick",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanKind {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "full" => Ok(Self::All),
            "specified" => Ok(Self::Specified),
            "quick" => Ok(Self::Quick),
            _ => Err(ScanError::UnknownMode(s.to_string())),
        }
    }
}

/// The probe shape used for every host of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "ports", rename_all = "lowercase")]
pub enum ScanMode {
    /// Exhaustive port sweep with fast timing.
    #[serde(rename = "all")]
    Full,
    /// Targeted sweep; `None` degrades to OS/service detection.
    Specified(Option<PortList>),
    /// Host discovery only.
    Quick,
}

impl ScanMode {
    /// Build a mode from its name and the optional raw port list.
    ///
    /// The port list only matters for `specified`; blank input counts as absent.
    pub fn from_parts(kind: ScanKind, ports: Option<&str>) -> Result<Self, ScanError> {
        match kind {
            ScanKind::All => Ok(Self::Full),
            ScanKind::Quick => Ok(Self::Quick),
            ScanKind::Specified => {
                let ports = match ports.map(str::trim).filter(|p| !p.is_empty()) {
                    Some(raw) => Some(raw.parse::<PortList>()?),
                    None => None,
                };
                Ok(Self::Specified(ports))
            }
        }
    }

    /// The mode's request name.
    pub fn kind(&self) -> ScanKind {
        match self {
            Self::Full => ScanKind::All,
            Self::Specified(_) => ScanKind::Specified,
            Self::Quick => ScanKind::Quick,
        }
    }

    /// Check if this mode runs OS detection (needs elevated privileges).
    pub fn needs_privileges(&self) -> bool {
        matches!(self, Self::Specified(None))
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Specified(Some(ports)) => write!(f, "specified ({})", ports),
            Self::Specified(None) => write!(f, "specified (OS detection)"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Runs one probe against one host and returns its raw report.
///
/// Implementations must honor `timeout` and must not expand ranges: each
/// call targets exactly one address.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(
        &self,
        host: HostTarget,
        mode: &ScanMode,
        timeout: Duration,
    ) -> Result<String, ProbeError>;
}
