use futures::stream::{self, StreamExt};
use macresolve_application::ports::{AddressTableSource, NeighborStream};
use macresolve_domain::{DomainError, MacAddress, NeighborEntry, NeighborState};
use std::net::IpAddr;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_PROC_NET_ARP: &str = "/proc/net/arp";

/// Completed entry.
const ATF_COM: u32 = 0x02;
/// Permanent entry.
const ATF_PERM: u32 = 0x04;

/// Linux IPv4 neighbor table reader (reads /proc/net/arp)
pub struct ProcNetArpTable {
    arp_path: String,
}

impl ProcNetArpTable {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PROC_NET_ARP)
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            arp_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.arp_path
    }

    async fn read_entries(&self) -> Result<Vec<NeighborEntry>, DomainError> {
        let content = fs::read_to_string(&self.arp_path).await.map_err(|e| {
            DomainError::AddressTable(format!("Failed to read {}: {}", self.arp_path, e))
        })?;

        let entries = parse_proc_net_arp(&content);
        debug!(entries = entries.len(), path = %self.arp_path, "ARP table parsed");
        Ok(entries)
    }
}

impl Default for ProcNetArpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressTableSource for ProcNetArpTable {
    fn entries(&self, cancel: &CancellationToken) -> NeighborStream<'_> {
        let cancel = cancel.clone();

        stream::once(async move {
            if cancel.is_cancelled() {
                return Err(DomainError::Canceled);
            }
            self.read_entries().await
        })
        .flat_map(|read| match read {
            Ok(entries) => stream::iter(entries.into_iter().map(Ok)).left_stream(),
            Err(e) => stream::iter(std::iter::once(Err(e))).right_stream(),
        })
        .boxed()
    }
}

// Format of /proc/net/arp:
// IP address       HW type     Flags       HW address            Mask     Device
// 192.168.1.1      0x1         0x2         aa:bb:cc:dd:ee:ff     *        eth0
pub fn parse_proc_net_arp(content: &str) -> Vec<NeighborEntry> {
    let mut entries = Vec::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }

        let ip: IpAddr = match fields[0].parse() {
            Ok(ip) => ip,
            Err(e) => {
                warn!(error = %e, ip = fields[0], "Invalid IP in ARP table");
                continue;
            }
        };

        let flags = match u32::from_str_radix(fields[2].trim_start_matches("0x"), 16) {
            Ok(flags) => flags,
            Err(e) => {
                warn!(error = %e, flags = fields[2], "Invalid flags in ARP table");
                continue;
            }
        };

        let mac = match fields[3].parse::<MacAddress>() {
            Ok(mac) if mac.is_zero() => None,
            Ok(mac) => Some(mac),
            Err(e) => {
                warn!(error = %e, mac = fields[3], "Invalid hardware address in ARP table");
                continue;
            }
        };

        // procfs carries no NUD state, only whether resolution completed.
        let state = if flags & ATF_COM == 0 {
            NeighborState::Incomplete
        } else {
            NeighborState::None
        };

        let mut entry = NeighborEntry::new(ip, mac)
            .with_state(state)
            .with_permanent(flags & ATF_PERM != 0);
        if let Some(device) = fields.get(5) {
            entry = entry.with_interface(device);
        }

        entries.push(entry);
    }

    entries
}
