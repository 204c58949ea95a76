use async_trait::async_trait;
use macresolve_domain::DomainError;
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;

/// Active prober that nudges the OS into refreshing its neighbor table.
///
/// Completion means the attempt finished, not that every address became resolvable.
/// Unreachable hosts are not errors; only scanner-level failures are.
#[async_trait]
pub trait NetworkScanner: Send + Sync {
    async fn scan_all(&self, cancel: &CancellationToken) -> Result<(), DomainError>;

    async fn scan_addresses(
        &self,
        addresses: &[IpAddr],
        cancel: &CancellationToken,
    ) -> Result<(), DomainError>;
}
