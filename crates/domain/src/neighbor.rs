use crate::mac_address::MacAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Neighbor cache state as reported by the platform (RFC 4861 §7.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborState {
    /// Unknown or not reported by the table.
    #[default]
    None,
    Incomplete,
    Reachable,
    Stale,
    Delay,
    Probe,
}

impl NeighborState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeighborState::None => "none",
            NeighborState::Incomplete => "incomplete",
            NeighborState::Reachable => "reachable",
            NeighborState::Stale => "stale",
            NeighborState::Delay => "delay",
            NeighborState::Probe => "probe",
        }
    }
}

impl fmt::Display for NeighborState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a neighbor (ARP/NDP) table.
///
/// `PartialEq` compares every field; use [`NeighborEntry::eq_except_state`] to detect
/// a pure state transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborEntry {
    pub ip: Option<IpAddr>,
    pub mac: Option<MacAddress>,
    pub is_permanent: bool,
    pub state: NeighborState,
    pub interface_id: Option<Arc<str>>,
}

impl NeighborEntry {
    pub const EMPTY: Self = Self {
        ip: None,
        mac: None,
        is_permanent: false,
        state: NeighborState::None,
        interface_id: None,
    };

    pub fn new(ip: IpAddr, mac: Option<MacAddress>) -> Self {
        Self {
            ip: Some(ip),
            mac,
            ..Self::EMPTY
        }
    }

    pub fn with_state(mut self, state: NeighborState) -> Self {
        self.state = state;
        self
    }

    pub fn with_permanent(mut self, is_permanent: bool) -> Self {
        self.is_permanent = is_permanent;
        self
    }

    pub fn with_interface(mut self, interface_id: &str) -> Self {
        self.interface_id = Some(Arc::from(interface_id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ip.is_none()
    }

    /// Hardware address usable for resolution: present and not the zero sentinel.
    pub fn resolved_mac(&self) -> Option<MacAddress> {
        self.mac.filter(|mac| !mac.is_zero())
    }

    /// Permanent or reachable entries are authoritative and win candidate selection.
    pub fn is_authoritative(&self) -> bool {
        self.is_permanent || self.state == NeighborState::Reachable
    }

    pub fn eq_except_state(&self, other: &Self) -> bool {
        self.ip == other.ip
            && self.mac == other.mac
            && self.is_permanent == other.is_permanent
            && self.interface_id == other.interface_id
    }
}

impl Default for NeighborEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}
