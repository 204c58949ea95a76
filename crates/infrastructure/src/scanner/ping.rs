use crate::process;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use ipnetwork::IpNetwork;
use macresolve_application::ports::NetworkScanner;
use macresolve_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const DEFAULT_MAX_HOSTS: u32 = 65_536;

/// Sends one ICMP echo request per address through the system `ping` tool. A reply or a
/// timeout both leave the kernel with a fresh neighbor entry attempt, so unreachable hosts
/// are not failures.
pub struct PingNetworkScanner {
    program: String,
    timeout: Duration,
    max_concurrency: usize,
    max_hosts: u32,
    targets: Vec<IpNetwork>,
}

impl PingNetworkScanner {
    pub fn new(targets: Vec<IpNetwork>) -> Self {
        Self {
            program: "ping".to_string(),
            timeout: Duration::from_secs(1),
            max_concurrency: 32,
            max_hosts: DEFAULT_MAX_HOSTS,
            targets,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_max_hosts(mut self, max_hosts: u32) -> Self {
        self.max_hosts = max_hosts;
        self
    }

    /// Host addresses of the configured IPv4 networks. IPv6 networks are skipped; they are
    /// far too large to sweep.
    pub fn expand_targets(&self) -> Result<Vec<IpAddr>, DomainError> {
        if self.targets.is_empty() {
            return Err(DomainError::Scanner(
                "ping sweep needs at least one target network".to_string(),
            ));
        }

        let mut hosts = Vec::new();
        for network in &self.targets {
            let IpNetwork::V4(v4) = network else {
                debug!(%network, "Skipping IPv6 network in ping sweep");
                continue;
            };

            if v4.size() > self.max_hosts {
                return Err(DomainError::Scanner(format!(
                    "{} has {} addresses, more than the limit of {}",
                    network,
                    v4.size(),
                    self.max_hosts
                )));
            }

            if v4.prefix() >= 31 {
                hosts.extend(v4.iter().map(IpAddr::V4));
            } else {
                let (first, last) = (v4.network(), v4.broadcast());
                hosts.extend(
                    v4.iter()
                        .filter(|ip| *ip != first && *ip != last)
                        .map(IpAddr::V4),
                );
            }
        }

        Ok(hosts)
    }

    fn ping_args(&self, ip: IpAddr) -> Vec<String> {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            self.timeout.as_secs().max(1).to_string(),
            ip.to_string(),
        ]
    }

    async fn probe(&self, ip: IpAddr, cancel: &CancellationToken) -> Result<bool, DomainError> {
        let output =
            process::run(&self.program, &self.ping_args(ip), cancel, DomainError::Scanner).await?;
        Ok(output.success())
    }

    async fn sweep(
        &self,
        addresses: Vec<IpAddr>,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let total = addresses.len();

        let replies = stream::iter(addresses)
            .map(|ip| self.probe(ip, cancel))
            .buffer_unordered(self.max_concurrency)
            .try_fold(0usize, |replies, answered| async move {
                Ok(replies + usize::from(answered))
            })
            .await?;

        info!(probed = total, replies, "Ping sweep finished");
        Ok(())
    }
}

#[async_trait]
impl NetworkScanner for PingNetworkScanner {
    async fn scan_all(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let hosts = self.expand_targets()?;
        self.sweep(hosts, cancel).await
    }

    async fn scan_addresses(
        &self,
        addresses: &[IpAddr],
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        self.sweep(addresses.to_vec(), cancel).await
    }
}
