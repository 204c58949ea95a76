use macresolve_application::{ResolutionEngine, ScanOutcome};
use macresolve_domain::{Config, DomainError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_INVALIDATED_REFRESH_SECS: u64 = 30;
const DEFAULT_FULL_REFRESH_SECS: u64 = 0;

/// Periodically rescans invalidated addresses and, optionally, the whole network.
///
/// An interval of 0 disables the corresponding loop. Scan errors are logged and the loop
/// keeps going; a disposed engine ends it.
pub struct ResolverMaintenanceJob {
    engine: Arc<ResolutionEngine>,
    invalidated_refresh_secs: u64,
    full_refresh_secs: u64,
    shutdown: CancellationToken,
}

impl ResolverMaintenanceJob {
    pub fn new(engine: Arc<ResolutionEngine>) -> Self {
        Self {
            engine,
            invalidated_refresh_secs: DEFAULT_INVALIDATED_REFRESH_SECS,
            full_refresh_secs: DEFAULT_FULL_REFRESH_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    /// Intervals taken from `[maintenance]`, with the full refresh following the resolver's
    /// staleness interval unless set explicitly.
    pub fn from_config(engine: Arc<ResolutionEngine>, config: &Config) -> Self {
        Self::new(engine).with_intervals(
            config.maintenance.invalidated_refresh_secs,
            config.full_refresh_secs(),
        )
    }

    pub fn with_intervals(mut self, invalidated_secs: u64, full_secs: u64) -> Self {
        self.invalidated_refresh_secs = invalidated_secs;
        self.full_refresh_secs = full_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            invalidated_refresh_secs = self.invalidated_refresh_secs,
            full_refresh_secs = self.full_refresh_secs,
            "Starting resolver maintenance background jobs"
        );

        if self.invalidated_refresh_secs > 0 {
            let job = Arc::clone(&self);
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(Duration::from_secs(job.invalidated_refresh_secs));
                loop {
                    tokio::select! {
                        _ = job.shutdown.cancelled() => {
                            info!("ResolverMaintenanceJob (invalidated): shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            if job.engine.is_disposed() {
                                info!("Resolution engine disposed, stopping maintenance loop");
                                break;
                            }
                            if !job.engine.has_invalidated() {
                                continue;
                            }
                            let result = job
                                .engine
                                .refresh_invalidated_addresses(&job.shutdown)
                                .await;
                            if !job.handle("invalidated", result) {
                                break;
                            }
                        }
                    }
                }
            });
        }

        if self.full_refresh_secs > 0 {
            let job = Arc::clone(&self);
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(Duration::from_secs(job.full_refresh_secs));
                loop {
                    tokio::select! {
                        _ = job.shutdown.cancelled() => {
                            info!("ResolverMaintenanceJob (full): shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            let result = job.engine.refresh_address_table(&job.shutdown).await;
                            if !job.handle("full", result) {
                                break;
                            }
                        }
                    }
                }
            });
        }
    }

    /// Logs one cycle; false when the loop must stop.
    fn handle(&self, cycle: &'static str, result: Result<ScanOutcome, DomainError>) -> bool {
        match result {
            Ok(ScanOutcome::Skipped(reason)) => {
                debug!(cycle, reason = ?reason, "Resolver refresh skipped");
                true
            }
            Ok(outcome) => {
                info!(cycle, outcome = ?outcome, "Resolver refresh cycle completed");
                true
            }
            Err(DomainError::Disposed) => {
                info!(cycle, "Resolution engine disposed, stopping maintenance loop");
                false
            }
            Err(DomainError::Canceled) => false,
            Err(e) => {
                error!(cycle, error = %e, "Resolver refresh cycle failed");
                true
            }
        }
    }
}
