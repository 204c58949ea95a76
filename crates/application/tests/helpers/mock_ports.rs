#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use macresolve_application::ports::{AddressTableSource, NeighborStream, NetworkScanner};
use macresolve_domain::{DomainError, MacAddress, NeighborEntry, NeighborState};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

pub fn mac(s: &str) -> MacAddress {
    s.parse().unwrap()
}

pub fn entry(ip_str: &str, mac_str: &str, state: NeighborState) -> NeighborEntry {
    NeighborEntry::new(ip(ip_str), Some(mac(mac_str))).with_state(state)
}

#[derive(Clone, Default)]
pub struct MockTableSource {
    entries: Arc<RwLock<Vec<NeighborEntry>>>,
    reads: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
    hang_after_entries: Arc<AtomicBool>,
}

impl MockTableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<NeighborEntry>) -> Self {
        let source = Self::new();
        source.set_entries(entries);
        source
    }

    pub fn set_entries(&self, entries: Vec<NeighborEntry>) {
        *self.entries.write().unwrap() = entries;
    }

    pub fn push(&self, entry: NeighborEntry) {
        self.entries.write().unwrap().push(entry);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Keeps the stream open after the last entry until the consumer gives up.
    pub fn set_hang_after_entries(&self, hang: bool) {
        self.hang_after_entries.store(hang, Ordering::SeqCst);
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl AddressTableSource for MockTableSource {
    fn entries(&self, _cancel: &CancellationToken) -> NeighborStream<'_> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.should_fail.load(Ordering::SeqCst) {
            return stream::once(async {
                Err(DomainError::AddressTable("mock table unavailable".to_string()))
            })
            .boxed();
        }

        let snapshot: Vec<_> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .cloned()
            .map(Ok)
            .collect();

        if self.hang_after_entries.load(Ordering::SeqCst) {
            stream::iter(snapshot).chain(stream::pending()).boxed()
        } else {
            stream::iter(snapshot).boxed()
        }
    }
}

#[derive(Clone, Default)]
pub struct MockNetworkScanner {
    full_calls: Arc<AtomicU64>,
    partial_calls: Arc<AtomicU64>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    delay: Arc<Mutex<Duration>>,
    should_fail: Arc<AtomicBool>,
    scanned: Arc<Mutex<Vec<Vec<IpAddr>>>>,
    discovery: Arc<Mutex<Option<(MockTableSource, Vec<NeighborEntry>)>>>,
}

impl MockNetworkScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        let scanner = Self::new();
        scanner.set_delay(delay);
        scanner
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Entries appended to `source` whenever a full scan completes.
    pub fn set_discovery(&self, source: MockTableSource, entries: Vec<NeighborEntry>) {
        *self.discovery.lock().unwrap() = Some((source, entries));
    }

    pub fn full_calls(&self) -> u64 {
        self.full_calls.load(Ordering::SeqCst)
    }

    pub fn partial_calls(&self) -> u64 {
        self.partial_calls.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn scanned(&self) -> Vec<Vec<IpAddr>> {
        self.scanned.lock().unwrap().clone()
    }

    async fn probe(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(DomainError::Canceled),
            _ = tokio::time::sleep(delay) => {
                if self.should_fail.load(Ordering::SeqCst) {
                    Err(DomainError::Scanner("mock scanner failed".to_string()))
                } else {
                    Ok(())
                }
            }
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl NetworkScanner for MockNetworkScanner {
    async fn scan_all(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.full_calls.fetch_add(1, Ordering::SeqCst);
        self.probe(cancel).await?;

        if let Some((source, entries)) = self.discovery.lock().unwrap().as_ref() {
            for entry in entries {
                source.push(entry.clone());
            }
        }
        Ok(())
    }

    async fn scan_addresses(
        &self,
        addresses: &[IpAddr],
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        self.partial_calls.fetch_add(1, Ordering::SeqCst);
        self.scanned.lock().unwrap().push(addresses.to_vec());
        self.probe(cancel).await
    }
}
