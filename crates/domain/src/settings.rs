use crate::errors::DomainError;
use std::time::Duration;

pub const DEFAULT_FULL_SCAN_INTERVAL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_FULL_SCAN_MIN_INTERVAL: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_PARALLEL_PARTIAL_SCANS: usize = 3;

/// Scheduling knobs of a resolution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Staleness threshold that triggers an automatic full scan before resolving.
    /// `None` never triggers one.
    pub full_scan_interval: Option<Duration>,

    /// Floor between two full scans, explicit or automatic. Zero disables it.
    pub full_scan_min_interval: Duration,

    /// Partial scans allowed to run at the same time.
    pub max_parallel_partial_scans: usize,
}

impl ResolverSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_parallel_partial_scans == 0 {
            return Err(DomainError::InvalidArgument(
                "max_parallel_partial_scans must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            full_scan_interval: Some(DEFAULT_FULL_SCAN_INTERVAL),
            full_scan_min_interval: DEFAULT_FULL_SCAN_MIN_INTERVAL,
            max_parallel_partial_scans: DEFAULT_MAX_PARALLEL_PARTIAL_SCANS,
        }
    }
}
