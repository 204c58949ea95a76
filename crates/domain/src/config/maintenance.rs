use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaintenanceConfig {
    /// Allows `watch` to run background refreshes.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_invalidated_refresh_secs")]
    pub invalidated_refresh_secs: u64,

    /// Periodic full refresh. 0 follows `resolver.network_scan_interval_secs`.
    #[serde(default)]
    pub full_refresh_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            invalidated_refresh_secs: default_invalidated_refresh_secs(),
            full_refresh_secs: 0,
        }
    }
}

fn default_invalidated_refresh_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}
