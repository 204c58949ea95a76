use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::maintenance::MaintenanceConfig;
use super::network::NetworkConfig;
use super::resolver::ResolverConfig;
use super::scanner::{ScannerConfig, ScannerKind};
use super::table::TableConfig;

const LOCAL_CONFIG_PATH: &str = "macresolve.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/macresolve/config.toml";

/// Main configuration structure for macresolve
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Scan scheduling (staleness interval, rate limit, parallelism)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Interface scope and scan ranges
    #[serde(default)]
    pub network: NetworkConfig,

    /// Neighbor table source
    #[serde(default)]
    pub table: TableConfig,

    /// Active network scanner
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Background refresh job
    #[serde(default)]
    pub maintenance: MaintenanceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. macresolve.toml in current directory
    /// 3. /etc/macresolve/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(interface) = overrides.interface {
            self.network.interface = Some(interface);
        }
        if let Some(kind) = overrides.scanner {
            self.scanner.kind = kind;
        }
        if let Some(targets) = overrides.targets {
            self.network.targets = targets;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Seconds between background full refreshes; 0 means none.
    pub fn full_refresh_secs(&self) -> u64 {
        match self.maintenance.full_refresh_secs {
            0 => self.resolver.network_scan_interval_secs,
            secs => secs,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.max_parallel_refresh == 0 {
            return Err(ConfigError::Validation(
                "max_parallel_refresh must be at least 1".to_string(),
            ));
        }

        if !self.network.ipv4 && !self.network.ipv6 {
            return Err(ConfigError::Validation(
                "At least one of ipv4/ipv6 must be enabled".to_string(),
            ));
        }

        self.network
            .parse_targets()
            .map_err(ConfigError::Validation)?;

        match self.scanner.kind {
            ScannerKind::None => {}
            ScannerKind::ArpScan if self.network.interface.is_none() => {
                return Err(ConfigError::Validation(
                    "arp-scan requires network.interface".to_string(),
                ));
            }
            ScannerKind::Ping | ScannerKind::Nmap if self.network.targets.is_empty() => {
                return Err(ConfigError::Validation(format!(
                    "{} scanner requires at least one network.targets entry",
                    self.scanner.kind
                )));
            }
            _ => {
                if self.scanner.max_concurrency == 0 {
                    return Err(ConfigError::Validation(
                        "scanner.max_concurrency must be at least 1".to_string(),
                    ));
                }
            }
        }

        if self.maintenance.enabled && self.maintenance.invalidated_refresh_secs == 0 {
            return Err(ConfigError::Validation(
                "maintenance.invalidated_refresh_secs cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub interface: Option<String>,
    pub scanner: Option<ScannerKind>,
    pub targets: Option<Vec<String>>,
    pub log_level: Option<String>,
}
