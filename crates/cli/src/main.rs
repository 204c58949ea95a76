use clap::{Parser, Subcommand};
use futures::StreamExt;
use macresolve_application::EntryPredicate;
use macresolve_domain::config::ScannerKind;
use macresolve_domain::{CliOverrides, MacAddress, NeighborEntry};
use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "macresolve")]
#[command(version)]
#[command(about = "macresolve - MAC/IP address resolution over the local neighbor table")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Restrict lookups to one network interface
    #[arg(short = 'i', long, global = true)]
    interface: Option<String>,

    /// Active scanner (none, ping, nmap, arp-scan)
    #[arg(long, global = true)]
    scanner: Option<ScannerKind>,

    /// Network to scan, in CIDR notation (repeatable)
    #[arg(long = "target", value_name = "CIDR", global = true)]
    targets: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the hardware address of an IP address
    ResolveIp { ip: IpAddr },

    /// Print the IP address of a hardware address
    ResolveMac {
        mac: MacAddress,

        /// Print every IP address mapped to it
        #[arg(long)]
        all: bool,
    },

    /// Print the neighbor table as seen by the resolver
    List {
        /// Only entries with a usable hardware address
        #[arg(long)]
        resolved_only: bool,

        #[arg(long)]
        json: bool,
    },

    /// Scan the network, or only the given addresses
    Refresh {
        /// Address to rescan (repeatable); a full scan runs when none is given
        #[arg(long = "ip", value_name = "IP")]
        ips: Vec<IpAddr>,
    },

    /// Keep the table fresh in the background until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        interface: cli.interface.clone(),
        scanner: cli.scanner,
        targets: (!cli.targets.is_empty()).then(|| cli.targets.clone()),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    let engine = di::build_engine(&config)?;
    let cancel = CancellationToken::new();

    let code = match cli.command {
        Command::ResolveIp { ip } => match engine.resolve_ip_to_mac(ip, &cancel).await? {
            Some(mac) => {
                println!("{}", mac);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("{}: no hardware address found", ip);
                ExitCode::FAILURE
            }
        },

        Command::ResolveMac { mac, all } => {
            let ips = if all {
                engine.resolve_all_ips(mac, &cancel).await?
            } else {
                engine
                    .resolve_mac_to_ip(mac, &cancel)
                    .await?
                    .into_iter()
                    .collect()
            };

            if ips.is_empty() {
                eprintln!("{}: no IP address found", mac);
                ExitCode::FAILURE
            } else {
                for ip in ips {
                    println!("{}", ip);
                }
                ExitCode::SUCCESS
            }
        }

        Command::List {
            resolved_only,
            json,
        } => {
            let predicate = resolved_only.then(|| {
                let resolved: EntryPredicate =
                    Arc::new(|e: &NeighborEntry| e.resolved_mac().is_some());
                resolved
            });

            let mut entries = Vec::new();
            let mut stream = engine.enumerate_entries(predicate, &cancel)?;
            while let Some(entry) = stream.next().await {
                entries.push(entry?);
            }
            drop(stream);

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!("{}", format_entry(entry));
                }
            }
            ExitCode::SUCCESS
        }

        Command::Refresh { ips } => {
            let outcome = if ips.is_empty() {
                engine.refresh_address_table(&cancel).await?
            } else {
                for ip in ips {
                    engine.invalidate_ip(ip)?;
                }
                engine.refresh_invalidated_addresses(&cancel).await?
            };
            info!(outcome = ?outcome, "Refresh finished");
            println!("{:?}", outcome);
            ExitCode::SUCCESS
        }

        Command::Watch => {
            let job = Arc::new(di::build_maintenance_job(
                &config,
                engine.clone(),
                cancel.clone(),
            )?);
            job.start().await;

            info!("Watching neighbor table, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;

            info!("Shutting down");
            cancel.cancel();
            ExitCode::SUCCESS
        }
    };

    engine.dispose();
    Ok(code)
}

fn format_entry(entry: &NeighborEntry) -> String {
    let ip = entry
        .ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mac = entry
        .resolved_mac()
        .map(|mac| mac.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:<40} {:<17} {:<10} {:<9} {}",
        ip,
        mac,
        entry.state.as_str(),
        if entry.is_permanent { "permanent" } else { "" },
        entry.interface_id.as_deref().unwrap_or("-"),
    )
}
