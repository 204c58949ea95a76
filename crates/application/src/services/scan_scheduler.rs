use super::cancel_scope::CancelScope;
use super::invalidation_tracker::InvalidationTracker;
use crate::ports::NetworkScanner;
use arc_swap::ArcSwap;
use macresolve_domain::{DomainError, ResolverSettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another full scan holds the gate; the request was dropped.
    InProgress,
    /// The previous full scan finished less than the minimum interval ago.
    RateLimited,
    /// There was nothing to rescan.
    NothingInvalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    FullScan,
    PartialScan { addresses: usize },
    Skipped(SkipReason),
}

impl ScanOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ScanOutcome::Skipped(_))
    }
}

/// Owns the staleness clock and the two scan gates.
///
/// Full scans go through a single-permit gate with try-acquire semantics: a request that
/// finds it taken is dropped, never queued. Partial scans wait fairly for one of N slots.
///
/// The partial gate is resized in place. Shrinking below the number of scans in flight
/// records the surplus as debt, paid off by forgetting permits as they come back.
pub struct ScanScheduler {
    scanner: Option<Arc<dyn NetworkScanner>>,
    tracker: Arc<InvalidationTracker>,
    settings: ArcSwap<ResolverSettings>,
    last_full_scan_at: Mutex<Option<Instant>>,
    full_gate: Arc<Semaphore>,
    partial_gate: Arc<Semaphore>,
    partial_debt: AtomicUsize,
    resize_lock: Mutex<()>,
}

impl ScanScheduler {
    pub fn new(
        scanner: Option<Arc<dyn NetworkScanner>>,
        tracker: Arc<InvalidationTracker>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            scanner,
            tracker,
            partial_gate: Arc::new(Semaphore::new(settings.max_parallel_partial_scans)),
            partial_debt: AtomicUsize::new(0),
            resize_lock: Mutex::new(()),
            settings: ArcSwap::from_pointee(settings),
            last_full_scan_at: Mutex::new(None),
            full_gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn has_scanner(&self) -> bool {
        self.scanner.is_some()
    }

    pub fn settings(&self) -> ResolverSettings {
        **self.settings.load()
    }

    pub fn set_full_scan_interval(&self, interval: Option<Duration>) {
        self.settings.rcu(|current| ResolverSettings {
            full_scan_interval: interval,
            ..**current
        });
    }

    pub fn set_full_scan_min_interval(&self, min_interval: Duration) {
        self.settings.rcu(|current| ResolverSettings {
            full_scan_min_interval: min_interval,
            ..**current
        });
    }

    /// Scans already holding a slot keep it; new requests are admitted only while fewer
    /// than `max` scans run.
    pub fn set_max_parallel_partial_scans(&self, max: usize) -> Result<(), DomainError> {
        let next = ResolverSettings {
            max_parallel_partial_scans: max,
            ..self.settings()
        };
        next.validate()?;

        let _guard = self
            .resize_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = self.settings().max_parallel_partial_scans;

        if max > current {
            let grow = max - current;
            let repaid = self.take_partial_debt(grow);
            self.partial_gate.add_permits(grow - repaid);
        } else if max < current {
            let shrink = current - max;
            let forgotten = self.partial_gate.forget_permits(shrink);
            self.partial_debt.fetch_add(shrink - forgotten, Ordering::AcqRel);
        } else {
            return Ok(());
        }

        self.settings.rcu(|settings| ResolverSettings {
            max_parallel_partial_scans: max,
            ..**settings
        });
        debug!(max_parallel_partial_scans = max, "Partial scan gate resized");
        Ok(())
    }

    /// Cancels up to `amount` of outstanding debt and returns how much was cancelled.
    fn take_partial_debt(&self, amount: usize) -> usize {
        let previous = self
            .partial_debt
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |debt| {
                Some(debt.saturating_sub(amount))
            })
            .unwrap_or_else(|debt| debt);
        previous.min(amount)
    }

    async fn acquire_partial_slot(&self) -> Result<OwnedSemaphorePermit, DomainError> {
        loop {
            let permit = self
                .partial_gate
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| DomainError::Disposed)?;

            let owed = self
                .partial_debt
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |debt| {
                    debt.checked_sub(1)
                })
                .is_ok();
            if !owed {
                return Ok(permit);
            }
            permit.forget();
        }
    }

    pub fn last_full_scan_at(&self) -> Option<Instant> {
        *self
            .last_full_scan_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn mark_full_scan(&self, at: Instant) {
        *self
            .last_full_scan_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(at);
    }

    /// True when a scanner is configured and the staleness interval has elapsed since the
    /// last full scan, or no full scan ever ran.
    pub fn is_stale(&self) -> bool {
        if self.scanner.is_none() {
            return false;
        }
        let Some(interval) = self.settings().full_scan_interval else {
            return false;
        };

        match self.last_full_scan_at() {
            None => true,
            Some(last) => last
                .checked_add(interval)
                .map_or(false, |due| Instant::now() >= due),
        }
    }

    fn is_rate_limited(&self, now: Instant) -> bool {
        let min_interval = self.settings().full_scan_min_interval;
        if min_interval.is_zero() {
            return false;
        }

        self.last_full_scan_at()
            .and_then(|last| last.checked_add(min_interval))
            .map_or(false, |allowed_at| now < allowed_at)
    }

    fn scanner(&self) -> Result<&Arc<dyn NetworkScanner>, DomainError> {
        self.scanner.as_ref().ok_or_else(|| {
            DomainError::UnsupportedOperation("no network scanner is configured".to_string())
        })
    }

    pub async fn run_full_scan(&self, scope: &CancelScope) -> Result<ScanOutcome, DomainError> {
        let scanner = self.scanner()?;
        scope.check()?;

        let _permit = match self.full_gate.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                debug!("Full scan already running, request dropped");
                return Ok(ScanOutcome::Skipped(SkipReason::InProgress));
            }
            Err(TryAcquireError::Closed) => return Err(DomainError::Disposed),
        };

        if self.is_rate_limited(Instant::now()) {
            debug!(
                min_interval_ms = self.settings().full_scan_min_interval.as_millis() as u64,
                "Full scan skipped, minimum interval not reached"
            );
            return Ok(ScanOutcome::Skipped(SkipReason::RateLimited));
        }

        scope.check()?;
        info!("Starting full network scan");

        if let Err(e) = scope.run(scanner.scan_all(scope.token())).await {
            if !e.is_canceled() {
                warn!(error = %e, "Full network scan failed");
            }
            return Err(e);
        }

        self.tracker.clear();
        self.mark_full_scan(Instant::now());
        info!("Full network scan completed");

        Ok(ScanOutcome::FullScan)
    }

    pub async fn run_partial_scan(&self, scope: &CancelScope) -> Result<ScanOutcome, DomainError> {
        let scanner = self.scanner()?;
        scope.check()?;

        if !self.tracker.macs.is_empty() {
            info!(
                invalidated_macs = self.tracker.macs.len(),
                "Invalidated MAC addresses present, escalating to full scan"
            );
            return self.run_full_scan(scope).await;
        }

        if self.tracker.ips.is_empty() {
            return Ok(ScanOutcome::Skipped(SkipReason::NothingInvalidated));
        }

        let _permit = scope.run(self.acquire_partial_slot()).await?;

        let addresses = self.tracker.ips.snapshot();
        if addresses.is_empty() {
            return Ok(ScanOutcome::Skipped(SkipReason::NothingInvalidated));
        }

        scope.check()?;
        info!(addresses = addresses.len(), "Starting partial network scan");

        if let Err(e) = scope
            .run(scanner.scan_addresses(&addresses, scope.token()))
            .await
        {
            if !e.is_canceled() {
                warn!(error = %e, addresses = addresses.len(), "Partial network scan failed");
            }
            return Err(e);
        }

        // Addresses invalidated while the scan was running were not probed and stay.
        self.tracker.ips.remove_all(&addresses);
        info!(addresses = addresses.len(), "Partial network scan completed");

        Ok(ScanOutcome::PartialScan {
            addresses: addresses.len(),
        })
    }

    /// Closes both gates; later acquisitions fail with `Disposed`.
    pub fn close(&self) {
        self.full_gate.close();
        self.partial_gate.close();
    }
}
