use crate::settings::{
    ResolverSettings, DEFAULT_FULL_SCAN_INTERVAL, DEFAULT_FULL_SCAN_MIN_INTERVAL,
    DEFAULT_MAX_PARALLEL_PARTIAL_SCANS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Seconds before the table is considered stale and a full scan runs ahead of a
    /// resolve. 0 disables automatic scans.
    #[serde(default = "default_network_scan_interval_secs")]
    pub network_scan_interval_secs: u64,

    /// Minimum seconds between two full scans. 0 disables the floor.
    #[serde(default = "default_network_scan_min_interval_secs")]
    pub network_scan_min_interval_secs: u64,

    #[serde(default = "default_max_parallel_refresh")]
    pub max_parallel_refresh: usize,
}

impl ResolverConfig {
    pub fn to_settings(&self) -> ResolverSettings {
        ResolverSettings {
            full_scan_interval: match self.network_scan_interval_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            full_scan_min_interval: Duration::from_secs(self.network_scan_min_interval_secs),
            max_parallel_partial_scans: self.max_parallel_refresh,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            network_scan_interval_secs: default_network_scan_interval_secs(),
            network_scan_min_interval_secs: default_network_scan_min_interval_secs(),
            max_parallel_refresh: default_max_parallel_refresh(),
        }
    }
}

fn default_network_scan_interval_secs() -> u64 {
    DEFAULT_FULL_SCAN_INTERVAL.as_secs()
}

fn default_network_scan_min_interval_secs() -> u64 {
    DEFAULT_FULL_SCAN_MIN_INTERVAL.as_secs()
}

fn default_max_parallel_refresh() -> usize {
    DEFAULT_MAX_PARALLEL_PARTIAL_SCANS
}
