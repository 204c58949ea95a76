use crate::process;
use futures::stream::{self, StreamExt};
use macresolve_application::ports::{AddressTableSource, NeighborStream};
use macresolve_domain::{DomainError, MacAddress, NeighborEntry, NeighborState};
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_IP_COMMAND: &str = "ip";

/// Neighbor table reader backed by `ip neigh show`. Covers IPv4 and IPv6 and reports the
/// kernel's NUD state for every entry.
pub struct IpNeighborTable {
    program: String,
}

impl IpNeighborTable {
    pub fn new() -> Self {
        Self::with_command(DEFAULT_IP_COMMAND)
    }

    pub fn with_command(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn read_entries(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<NeighborEntry>, DomainError> {
        let output = process::run(
            &self.program,
            &["neigh", "show"],
            cancel,
            DomainError::AddressTable,
        )
        .await?;

        if !output.success() {
            return Err(DomainError::AddressTable(format!(
                "{} neigh show exited with {}: {}",
                self.program,
                output.exit_code,
                output.combined_output()
            )));
        }

        let entries = parse_ip_neigh(&output.stdout);
        debug!(entries = entries.len(), "Neighbor table parsed");
        Ok(entries)
    }
}

impl Default for IpNeighborTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressTableSource for IpNeighborTable {
    fn entries(&self, cancel: &CancellationToken) -> NeighborStream<'_> {
        let cancel = cancel.clone();

        stream::once(async move { self.read_entries(&cancel).await })
            .flat_map(|read| match read {
                Ok(entries) => stream::iter(entries.into_iter().map(Ok)).left_stream(),
                Err(e) => stream::iter(std::iter::once(Err(e))).right_stream(),
            })
            .boxed()
    }
}

// 192.168.1.1 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE
// fe80::1 dev eth0 lladdr aa:bb:cc:dd:ee:ff router STALE
// 192.168.1.9 dev eth0 FAILED
pub fn parse_ip_neigh(output: &str) -> Vec<NeighborEntry> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NeighborEntry> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;

    let ip: IpAddr = match first.parse() {
        Ok(ip) => ip,
        Err(e) => {
            warn!(error = %e, line, "Invalid IP in neighbor table");
            return None;
        }
    };

    let mut mac = None;
    let mut device = None;
    let mut state = NeighborState::None;
    let mut is_permanent = false;

    while let Some(token) = tokens.next() {
        match token {
            "dev" => device = tokens.next(),
            "lladdr" => match tokens.next().map(str::parse::<MacAddress>) {
                Some(Ok(parsed)) if !parsed.is_zero() => mac = Some(parsed),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, line, "Invalid hardware address in neighbor table");
                    return None;
                }
                None => {}
            },
            "REACHABLE" => state = NeighborState::Reachable,
            "STALE" => state = NeighborState::Stale,
            "DELAY" => state = NeighborState::Delay,
            "PROBE" => state = NeighborState::Probe,
            "INCOMPLETE" | "FAILED" => state = NeighborState::Incomplete,
            "PERMANENT" => is_permanent = true,
            // router, proxy, NOARP, NONE and flags such as extern_learn carry no state.
            _ => {}
        }
    }

    let mut entry = NeighborEntry::new(ip, mac)
        .with_state(state)
        .with_permanent(is_permanent);
    if let Some(device) = device {
        entry = entry.with_interface(device);
    }
    Some(entry)
}
