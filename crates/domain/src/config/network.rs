use crate::network::{NetworkInterface, NetworkProfile};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Interface entries are scoped to. Unset means every interface.
    #[serde(default)]
    pub interface: Option<String>,

    #[serde(default = "default_true")]
    pub ipv4: bool,

    #[serde(default = "default_true")]
    pub ipv6: bool,

    /// Ranges probed by a full scan, in CIDR notation.
    #[serde(default)]
    pub targets: Vec<String>,
}

impl NetworkConfig {
    pub fn parse_targets(&self) -> Result<Vec<IpNetwork>, String> {
        self.targets
            .iter()
            .map(|t| {
                t.parse::<IpNetwork>()
                    .map_err(|e| format!("Invalid CIDR {}: {}", t, e))
            })
            .collect()
    }

    pub fn to_profile(&self) -> Result<NetworkProfile, String> {
        let interface = self
            .interface
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| NetworkInterface::new(name).with_families(self.ipv4, self.ipv6));
        Ok(NetworkProfile::new(interface, self.parse_targets()?))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            interface: None,
            ipv4: true,
            ipv6: true,
            targets: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
