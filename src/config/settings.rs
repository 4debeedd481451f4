//! Scanner settings and paths.
//!
//! Settings live in a JSON file in the XDG config directory unless a path is
//! given explicitly. Nothing here is global: callers load a `ScannerSettings`
//! and inject it into the coordinator.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{CoordinatorConfig, FullSweep, NmapProbe, DEFAULT_MAX_HOSTS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/netsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "netsweep", "netsweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Injected scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// nmap binary, or a launcher such as `sudo`.
    pub probe_binary: PathBuf,
    /// Arguments placed before the nmap arguments.
    pub probe_prefix_args: Vec<String>,
    /// Maximum probes in flight.
    pub pool_size: usize,
    /// Per-host probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Aggregate scan budget in milliseconds, 0 for none.
    pub scan_budget_ms: u64,
    /// Probe launches per second, 0 for unlimited.
    pub launch_rate: u32,
    /// Largest block accepted, in hosts; 0 for no cap.
    pub max_hosts: u64,
    pub full_sweep: FullSweep,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            probe_binary: PathBuf::from("nmap"),
            probe_prefix_args: Vec::new(),
            pool_size: 16,
            probe_timeout_ms: 60_000,
            scan_budget_ms: 0,
            launch_rate: 0,
            max_hosts: DEFAULT_MAX_HOSTS,
            full_sweep: FullSweep::default(),
        }
    }
}

impl ScannerSettings {
    /// Load settings from an explicit file, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let file = Paths::discover()?.settings_file();
                if !file.exists() {
                    debug!(path = %file.display(), "no settings file, using defaults");
                    return Ok(Self::default());
                }
                Self::load_from(&file)
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reject values the coordinator cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidValue("pool_size must be at least 1".to_string()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "probe_timeout_ms must be positive".to_string(),
            ));
        }
        if self.probe_binary.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("probe_binary is empty".to_string()));
        }
        Ok(())
    }

    /// Coordinator limits derived from these settings.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let mut config = CoordinatorConfig::default()
            .with_pool_size(self.pool_size)
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .with_launch_rate(self.launch_rate);

        if self.scan_budget_ms > 0 {
            config = config.with_scan_budget(Duration::from_millis(self.scan_budget_ms));
        }
        config = match self.max_hosts {
            0 => config.without_max_hosts(),
            limit => config.with_max_hosts(limit),
        };
        config
    }

    /// The nmap probe described by these settings.
    pub fn probe(&self) -> NmapProbe {
        NmapProbe::new(&self.probe_binary)
            .with_prefix_args(self.probe_prefix_args.clone())
            .with_full_sweep(self.full_sweep.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::scanner::{Coordinator, ScanMode};
    use crate::types::AddressSpec;
    use std::sync::Arc;

    #[test]
    fn test_default_settings() {
        let settings = ScannerSettings::default();
        assert_eq!(settings.pool_size, 16);
        assert_eq!(settings.probe_timeout_ms, 60_000);
        assert!(settings.validate().is_ok());

        let config = settings.coordinator_config();
        assert_eq!(config.scan_budget, None);
        assert_eq!(config.max_hosts, Some(65_536));
    }

    #[tokio::test]
    async fn test_default_cap_rejects_huge_blocks() {
        let settings = ScannerSettings::default();
        let coordinator =
            Coordinator::new(Arc::new(settings.probe()), settings.coordinator_config()).unwrap();

        let spec = AddressSpec::parse("10.0.0.0/8").unwrap();
        let result = coordinator.run(&spec, &ScanMode::Quick).await;
        assert!(matches!(
            result,
            Err(ScanError::TooManyHosts { hosts: 16_777_216, limit: 65_536 })
        ));

        let spec = AddressSpec::parse("0.0.0.0/0").unwrap();
        assert!(coordinator.run(&spec, &ScanMode::Full).await.is_err());
    }

    #[test]
    fn test_zero_max_hosts_disables_cap() {
        let settings = ScannerSettings {
            max_hosts: 0,
            ..ScannerSettings::default()
        };
        assert_eq!(settings.coordinator_config().max_hosts, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"pool_size": 4, "scan_budget_ms": 30000, "full_sweep": {"min_rate": 1000}}"#,
        )
        .unwrap();

        let settings = ScannerSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.pool_size, 4);
        assert_eq!(settings.probe_binary, PathBuf::from("nmap"));
        assert_eq!(settings.full_sweep.min_rate, 1000);
        assert_eq!(settings.full_sweep.max_retries, 1);

        let config = settings.coordinator_config();
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.scan_budget, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = ScannerSettings {
            probe_binary: PathBuf::from("/usr/bin/nmap"),
            max_hosts: 1024,
            ..ScannerSettings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(ScannerSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"pool_size": 0}"#).unwrap();
        assert!(matches!(
            ScannerSettings::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ScannerSettings::load_from(&path),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScannerSettings::load(Some(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }
}
