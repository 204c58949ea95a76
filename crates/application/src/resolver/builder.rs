use super::engine::ResolutionEngine;
use crate::ports::{AddressTableSource, NetworkScanner};
use macresolve_domain::{DomainError, NetworkInterface, ResolverSettings};
use std::sync::Arc;
use tracing::info;

pub struct ResolutionEngineBuilder {
    source: Arc<dyn AddressTableSource>,
    scanner: Option<Arc<dyn NetworkScanner>>,
    interface: Option<NetworkInterface>,
    settings: ResolverSettings,
}

impl ResolutionEngineBuilder {
    pub fn new(source: Arc<dyn AddressTableSource>) -> Self {
        Self {
            source,
            scanner: None,
            interface: None,
            settings: ResolverSettings::default(),
        }
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn NetworkScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn with_interface(mut self, interface: NetworkInterface) -> Self {
        self.interface = Some(interface);
        self
    }

    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<ResolutionEngine, DomainError> {
        self.settings.validate()?;

        info!(
            scanner = self.scanner.is_some(),
            interface = self.interface.as_ref().map(|iface| iface.id.as_ref()),
            full_scan_interval_secs = self.settings.full_scan_interval.map(|d| d.as_secs()),
            full_scan_min_interval_secs = self.settings.full_scan_min_interval.as_secs(),
            max_parallel_partial_scans = self.settings.max_parallel_partial_scans,
            "Building resolution engine"
        );

        Ok(ResolutionEngine::new(
            self.source,
            self.scanner,
            self.interface,
            self.settings,
        ))
    }
}
