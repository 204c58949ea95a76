use futures::stream::BoxStream;
use macresolve_domain::{DomainError, NeighborEntry};
use tokio_util::sync::CancellationToken;

pub type NeighborStream<'a> = BoxStream<'a, Result<NeighborEntry, DomainError>>;

/// Read-only view of the platform neighbor table.
///
/// Every call yields a fresh snapshot. An empty table yields nothing rather than an error.
pub trait AddressTableSource: Send + Sync {
    fn entries(&self, cancel: &CancellationToken) -> NeighborStream<'_>;
}
