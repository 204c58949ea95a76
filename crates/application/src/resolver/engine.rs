use super::builder::ResolutionEngineBuilder;
use crate::ports::{AddressTableSource, NeighborStream, NetworkScanner};
use crate::services::{
    CancelScope, CandidateSelector, InvalidationTracker, Lookup, ScanOutcome, ScanScheduler,
    Verdict,
};
use futures::stream::{self, StreamExt};
use macresolve_domain::{
    DomainError, MacAddress, NeighborEntry, NetworkInterface, ResolverSettings,
};
use std::future;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Caller-supplied filter for [`ResolutionEngine::enumerate_entries`].
pub type EntryPredicate = Arc<dyn Fn(&NeighborEntry) -> bool + Send + Sync>;

/// Resolves IP addresses to hardware addresses and back over a neighbor table, scanning
/// the network when the table is stale or entries were invalidated.
///
/// Safe to share between tasks. Dropping the engine disposes it.
pub struct ResolutionEngine {
    source: Arc<dyn AddressTableSource>,
    interface: Option<NetworkInterface>,
    tracker: Arc<InvalidationTracker>,
    scheduler: ScanScheduler,
    disposed: AtomicBool,
    shutdown: CancellationToken,
}

impl ResolutionEngine {
    pub fn builder(source: Arc<dyn AddressTableSource>) -> ResolutionEngineBuilder {
        ResolutionEngineBuilder::new(source)
    }

    pub(super) fn new(
        source: Arc<dyn AddressTableSource>,
        scanner: Option<Arc<dyn NetworkScanner>>,
        interface: Option<NetworkInterface>,
        settings: ResolverSettings,
    ) -> Self {
        let tracker = Arc::new(InvalidationTracker::new());
        Self {
            source,
            interface,
            scheduler: ScanScheduler::new(scanner, tracker.clone(), settings),
            tracker,
            disposed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn interface(&self) -> Option<&NetworkInterface> {
        self.interface.as_ref()
    }

    pub fn has_scanner(&self) -> bool {
        self.scheduler.has_scanner()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn ensure_live(&self) -> Result<(), DomainError> {
        if self.is_disposed() {
            Err(DomainError::Disposed)
        } else {
            Ok(())
        }
    }

    fn scope(&self, cancel: &CancellationToken) -> Result<CancelScope, DomainError> {
        self.ensure_live()?;
        let scope = CancelScope::new(cancel.clone(), self.shutdown.clone());
        scope.check()?;
        Ok(scope)
    }

    async fn scan_if_stale(&self, scope: &CancelScope) -> Result<(), DomainError> {
        if self.scheduler.is_stale() {
            debug!("Neighbor table is stale, running full scan before lookup");
            self.scheduler.run_full_scan(scope).await?;
        }
        Ok(())
    }

    /// Entries of a fresh table read, restricted to the engine's interface and
    /// ending with `Canceled` when the scope is cancelled.
    fn scoped_entries(&self, scope: CancelScope) -> NeighborStream<'_> {
        let interface = self.interface.clone();
        let entries = self
            .source
            .entries(scope.token())
            .filter(move |item| {
                future::ready(match item {
                    Ok(entry) => {
                        !entry.is_empty()
                            && interface.as_ref().map_or(true, |iface| iface.admits(entry))
                    }
                    Err(_) => true,
                })
            })
            .boxed();

        cancellable(entries, scope)
    }

    async fn select(
        &self,
        lookup: Lookup,
        scope: CancelScope,
    ) -> Result<Option<NeighborEntry>, DomainError> {
        let mut entries = self.scoped_entries(scope);
        let mut selector = CandidateSelector::new(lookup, &self.tracker);

        while let Some(entry) = entries.next().await {
            if selector.offer(entry?) == Verdict::Decided {
                break;
            }
        }

        Ok(selector.finish())
    }

    #[instrument(skip(self, cancel))]
    pub async fn resolve_ip_to_mac(
        &self,
        ip: IpAddr,
        cancel: &CancellationToken,
    ) -> Result<Option<MacAddress>, DomainError> {
        let scope = self.scope(cancel)?;
        self.scan_if_stale(&scope).await?;

        let found = self.select(Lookup::Ip(ip), scope).await?;
        let mac = found.and_then(|entry| entry.resolved_mac());
        debug!(mac = ?mac, "IP lookup finished");
        Ok(mac)
    }

    #[instrument(skip(self, cancel))]
    pub async fn resolve_mac_to_ip(
        &self,
        mac: MacAddress,
        cancel: &CancellationToken,
    ) -> Result<Option<IpAddr>, DomainError> {
        let scope = self.scope(cancel)?;
        if mac.is_zero() {
            return Ok(None);
        }
        self.scan_if_stale(&scope).await?;

        let found = self.select(Lookup::Mac(mac), scope).await?;
        let ip = found.and_then(|entry| entry.ip);
        debug!(ip = ?ip, "MAC lookup finished");
        Ok(ip)
    }

    /// Every eligible IP currently mapped to `mac`, distinct, in table order.
    #[instrument(skip(self, cancel))]
    pub async fn resolve_all_ips(
        &self,
        mac: MacAddress,
        cancel: &CancellationToken,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let scope = self.scope(cancel)?;
        if mac.is_zero() {
            return Ok(Vec::new());
        }
        self.scan_if_stale(&scope).await?;

        let selector = CandidateSelector::new(Lookup::Mac(mac), &self.tracker);
        let mut entries = self.scoped_entries(scope);
        let mut ips: Vec<IpAddr> = Vec::new();

        while let Some(entry) = entries.next().await {
            let entry = entry?;
            if !selector.is_eligible(&entry) {
                continue;
            }
            if let Some(ip) = entry.ip {
                if !ips.contains(&ip) {
                    ips.push(ip);
                }
            }
        }

        Ok(ips)
    }

    pub fn invalidate_ip(&self, ip: IpAddr) -> Result<(), DomainError> {
        self.ensure_live()?;
        if ip.is_unspecified() {
            return Err(DomainError::InvalidIpAddress(format!(
                "cannot invalidate unspecified address {}",
                ip
            )));
        }

        if self.tracker.ips.add(ip) {
            debug!(%ip, "IP address invalidated");
        }
        Ok(())
    }

    pub fn invalidate_mac(&self, mac: MacAddress) -> Result<(), DomainError> {
        self.ensure_live()?;
        if mac.is_zero() {
            return Err(DomainError::InvalidMacAddress(
                "cannot invalidate the all-zero hardware address".to_string(),
            ));
        }

        if self.tracker.macs.add(mac) {
            debug!(%mac, "Hardware address invalidated");
        }
        Ok(())
    }

    pub fn has_invalidated(&self) -> bool {
        !self.tracker.is_empty()
    }

    pub fn invalidated_ips(&self) -> Vec<IpAddr> {
        self.tracker.ips.snapshot()
    }

    pub fn invalidated_macs(&self) -> Vec<MacAddress> {
        self.tracker.macs.snapshot()
    }

    #[instrument(skip(self, cancel))]
    pub async fn refresh_address_table(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, DomainError> {
        let scope = self.scope(cancel)?;
        self.scheduler.run_full_scan(&scope).await
    }

    #[instrument(skip(self, cancel))]
    pub async fn refresh_invalidated_addresses(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, DomainError> {
        let scope = self.scope(cancel)?;
        self.scheduler.run_partial_scan(&scope).await
    }

    /// Lazily reads the table, yielding entries in the engine's interface scope that pass
    /// `predicate`. Each call starts a fresh read.
    pub fn enumerate_entries(
        &self,
        predicate: Option<EntryPredicate>,
        cancel: &CancellationToken,
    ) -> Result<NeighborStream<'_>, DomainError> {
        let scope = self.scope(cancel)?;
        let entries = self.scoped_entries(scope);

        Ok(match predicate {
            None => entries,
            Some(predicate) => entries
                .filter(move |item| {
                    future::ready(match item {
                        Ok(entry) => predicate(entry),
                        Err(_) => true,
                    })
                })
                .boxed(),
        })
    }

    pub fn settings(&self) -> ResolverSettings {
        self.scheduler.settings()
    }

    pub fn full_scan_interval(&self) -> Option<Duration> {
        self.settings().full_scan_interval
    }

    pub fn set_full_scan_interval(&self, interval: Option<Duration>) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.scheduler.set_full_scan_interval(interval);
        Ok(())
    }

    pub fn full_scan_min_interval(&self) -> Duration {
        self.settings().full_scan_min_interval
    }

    pub fn set_full_scan_min_interval(&self, min_interval: Duration) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.scheduler.set_full_scan_min_interval(min_interval);
        Ok(())
    }

    pub fn max_parallel_partial_scans(&self) -> usize {
        self.settings().max_parallel_partial_scans
    }

    pub fn set_max_parallel_partial_scans(&self, max: usize) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.scheduler.set_max_parallel_partial_scans(max)
    }

    pub fn last_full_scan_at(&self) -> Option<Instant> {
        self.scheduler.last_full_scan_at()
    }

    /// Cancels in-flight operations and closes the scan gates. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.shutdown.cancel();
        self.scheduler.close();
        info!("Resolution engine disposed");
    }
}

impl Drop for ResolutionEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Wraps `inner` so that it yields a single `Canceled` error and ends once `scope` is
/// cancelled, checked before every element.
fn cancellable<'a>(inner: NeighborStream<'a>, scope: CancelScope) -> NeighborStream<'a> {
    stream::unfold(Some((inner, scope)), |state| async move {
        let (mut inner, scope) = state?;

        let next = tokio::select! {
            biased;
            _ = scope.cancelled() => None,
            item = inner.next() => Some(item),
        };

        match next {
            None => Some((Err(DomainError::Canceled), None)),
            Some(Some(item)) => Some((item, Some((inner, scope)))),
            Some(None) => None,
        }
    })
    .boxed()
}
