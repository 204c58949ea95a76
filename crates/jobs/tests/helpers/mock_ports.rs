use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use macresolve_application::ports::{AddressTableSource, NeighborStream, NetworkScanner};
use macresolve_application::ResolutionEngine;
use macresolve_domain::{DomainError, ResolverSettings};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct EmptyTableSource;

impl AddressTableSource for EmptyTableSource {
    fn entries(&self, _cancel: &CancellationToken) -> NeighborStream<'_> {
        stream::empty().boxed()
    }
}

#[derive(Clone, Default)]
pub struct MockNetworkScanner {
    full_calls: Arc<AtomicU64>,
    partial_calls: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
}

impl MockNetworkScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn full_calls(&self) -> u64 {
        self.full_calls.load(Ordering::SeqCst)
    }

    pub fn partial_calls(&self) -> u64 {
        self.partial_calls.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            Err(DomainError::Scanner("mock scanner failed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NetworkScanner for MockNetworkScanner {
    async fn scan_all(&self, _cancel: &CancellationToken) -> Result<(), DomainError> {
        self.full_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn scan_addresses(
        &self,
        _addresses: &[IpAddr],
        _cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        self.partial_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }
}

pub fn engine_with(scanner: &MockNetworkScanner) -> Arc<ResolutionEngine> {
    Arc::new(
        ResolutionEngine::builder(Arc::new(EmptyTableSource))
            .with_scanner(Arc::new(scanner.clone()))
            .with_settings(ResolverSettings {
                full_scan_interval: None,
                full_scan_min_interval: Duration::ZERO,
                max_parallel_partial_scans: 3,
            })
            .build()
            .unwrap(),
    )
}
