use crate::neighbor::NeighborEntry;
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::sync::Arc;

/// Network interface an engine is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub id: Arc<str>,
    pub supports_ipv4: bool,
    pub supports_ipv6: bool,
}

impl NetworkInterface {
    /// Dual-stack interface.
    pub fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            supports_ipv4: true,
            supports_ipv6: true,
        }
    }

    pub fn with_families(mut self, ipv4: bool, ipv6: bool) -> Self {
        self.supports_ipv4 = ipv4;
        self.supports_ipv6 = ipv6;
        self
    }

    /// Interface identifiers are GUIDs on Windows and compare case-insensitively there.
    pub fn matches_id(&self, other: &str) -> bool {
        if cfg!(windows) {
            self.id.eq_ignore_ascii_case(other)
        } else {
            *self.id == *other
        }
    }

    pub fn supports(&self, ip: &IpAddr) -> bool {
        match ip {
            IpAddr::V4(_) => self.supports_ipv4,
            IpAddr::V6(_) => self.supports_ipv6,
        }
    }

    /// Untagged entries are admitted; tagged entries must belong to this interface, and the
    /// entry's address family must be supported.
    pub fn admits(&self, entry: &NeighborEntry) -> bool {
        if let Some(id) = entry.interface_id.as_deref() {
            if !self.matches_id(id) {
                return false;
            }
        }

        entry.ip.as_ref().map_or(true, |ip| self.supports(ip))
    }
}

/// Where to look: the interface entries are scoped to and the ranges scanners probe.
#[derive(Debug, Clone, Default)]
pub struct NetworkProfile {
    pub interface: Option<NetworkInterface>,
    pub targets: Vec<IpNetwork>,
}

impl NetworkProfile {
    pub fn new(interface: Option<NetworkInterface>, targets: Vec<IpNetwork>) -> Self {
        Self { interface, targets }
    }

    pub fn interface_id(&self) -> Option<&str> {
        self.interface.as_ref().map(|iface| iface.id.as_ref())
    }
}
