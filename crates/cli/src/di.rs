use anyhow::{anyhow, bail, Context};
use macresolve_application::ports::{AddressTableSource, NetworkScanner};
use macresolve_application::ResolutionEngine;
use macresolve_domain::config::{ScannerKind, TableSourceKind};
use macresolve_domain::{Config, NetworkProfile};
use macresolve_infrastructure::scanner::{CommandNetworkScanner, PingNetworkScanner, ScanTool};
use macresolve_infrastructure::system::{IpNeighborTable, ProcNetArpTable};
use macresolve_jobs::ResolverMaintenanceJob;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub fn build_source(config: &Config) -> Arc<dyn AddressTableSource> {
    let table = &config.table;
    match table.source {
        TableSourceKind::Procfs => Arc::new(ProcNetArpTable::with_path(&table.procfs_path)),
        TableSourceKind::IpNeigh => Arc::new(IpNeighborTable::with_command(&table.ip_command)),
    }
}

pub fn build_scanner(
    config: &Config,
    profile: &NetworkProfile,
) -> anyhow::Result<Option<Arc<dyn NetworkScanner>>> {
    let scanner = &config.scanner;
    let Some(program) = scanner.command() else {
        return Ok(None);
    };

    let built: Arc<dyn NetworkScanner> = match scanner.kind {
        ScannerKind::None => return Ok(None),
        ScannerKind::Ping => Arc::new(
            PingNetworkScanner::new(profile.targets.clone())
                .with_program(program)
                .with_timeout(Duration::from_secs(scanner.timeout_secs))
                .with_max_concurrency(scanner.max_concurrency),
        ),
        ScannerKind::Nmap | ScannerKind::ArpScan => {
            let tool = if scanner.kind == ScannerKind::Nmap {
                ScanTool::Nmap
            } else {
                ScanTool::ArpScan
            };
            let mut command =
                CommandNetworkScanner::new(tool, profile.targets.clone()).with_program(program);
            if let Some(interface) = profile.interface_id() {
                command = command.with_interface(interface);
            }
            Arc::new(command)
        }
    };

    Ok(Some(built))
}

pub fn build_engine(config: &Config) -> anyhow::Result<Arc<ResolutionEngine>> {
    let profile = config
        .network
        .to_profile()
        .map_err(|e| anyhow!(e))
        .context("Invalid network configuration")?;

    info!(
        table = ?config.table.source,
        scanner = %config.scanner.kind,
        interface = profile.interface_id(),
        targets = profile.targets.len(),
        "Wiring resolution engine"
    );

    let mut builder = ResolutionEngine::builder(build_source(config))
        .with_settings(config.resolver.to_settings());

    if let Some(scanner) = build_scanner(config, &profile)? {
        builder = builder.with_scanner(scanner);
    }
    if let Some(interface) = profile.interface {
        builder = builder.with_interface(interface);
    }

    Ok(Arc::new(builder.build()?))
}

pub fn build_maintenance_job(
    config: &Config,
    engine: Arc<ResolutionEngine>,
    shutdown: CancellationToken,
) -> anyhow::Result<ResolverMaintenanceJob> {
    if !config.maintenance.enabled {
        bail!("background maintenance is disabled ([maintenance] enabled = false)");
    }
    if !engine.has_scanner() {
        bail!("background maintenance needs a network scanner ([scanner] kind)");
    }

    Ok(ResolverMaintenanceJob::from_config(engine, config).with_cancellation(shutdown))
}
