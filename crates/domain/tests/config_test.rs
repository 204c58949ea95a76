use macresolve_domain::config::{ScannerKind, TableSourceKind};
use macresolve_domain::{CliOverrides, Config};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.resolver.network_scan_interval_secs, 900);
    assert_eq!(config.resolver.network_scan_min_interval_secs, 20);
    assert_eq!(config.resolver.max_parallel_refresh, 3);
    assert!(config.network.interface.is_none());
    assert_eq!(config.table.source, TableSourceKind::Procfs);
    assert_eq!(config.table.procfs_path, "/proc/net/arp");
    assert_eq!(config.scanner.kind, ScannerKind::None);
    assert!(config.maintenance.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_resolver_settings_conversion() {
    let config = Config::from_toml(
        r#"
[resolver]
network_scan_interval_secs = 0
network_scan_min_interval_secs = 5
max_parallel_refresh = 8
"#,
    )
    .unwrap();

    let settings = config.resolver.to_settings();
    assert_eq!(settings.full_scan_interval, None);
    assert_eq!(settings.full_scan_min_interval, Duration::from_secs(5));
    assert_eq!(settings.max_parallel_partial_scans, 8);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let config = Config::from_toml(
        r#"
[network]
interface = "wlan0"
targets = ["192.168.1.0/24"]

[scanner]
kind = "arp-scan"
"#,
    )
    .unwrap();

    assert_eq!(config.scanner.kind, ScannerKind::ArpScan);
    assert_eq!(config.scanner.command(), Some("arp-scan"));
    assert_eq!(config.resolver.max_parallel_refresh, 3);

    let profile = config.network.to_profile().unwrap();
    assert_eq!(profile.interface_id(), Some("wlan0"));
    assert_eq!(profile.targets.len(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.resolver.max_parallel_refresh = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.network.targets = vec!["not-a-cidr".to_string()];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.scanner.kind = ScannerKind::ArpScan;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.network.ipv4 = false;
    config.network.ipv6 = false;
    assert!(config.validate().is_err());
}

#[test]
fn test_sweeping_scanners_require_targets() {
    for kind in ["ping", "nmap"] {
        let config = Config::from_toml(&format!("[scanner]\nkind = \"{}\"\n", kind)).unwrap();
        assert!(
            config.validate().is_err(),
            "{} without targets must be rejected",
            kind
        );

        let config = Config::from_toml(&format!(
            "[scanner]\nkind = \"{}\"\n[network]\ntargets = [\"192.168.1.0/24\"]\n",
            kind
        ))
        .unwrap();
        assert!(config.validate().is_ok());
    }

    let config =
        Config::from_toml("[scanner]\nkind = \"arp-scan\"\n[network]\ninterface = \"eth0\"\n")
            .unwrap();
    assert!(config.validate().is_ok(), "arp-scan falls back to the local segment");
}

#[test]
fn test_full_refresh_follows_staleness_interval_when_unset() {
    let mut config = Config::default();
    assert_eq!(config.full_refresh_secs(), 900);

    config.maintenance.full_refresh_secs = 60;
    assert_eq!(config.full_refresh_secs(), 60);

    config.maintenance.full_refresh_secs = 0;
    config.resolver.network_scan_interval_secs = 0;
    assert_eq!(config.full_refresh_secs(), 0);
}

#[test]
fn test_load_from_file_applies_cli_overrides() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[logging]\nlevel = \"warn\"\n[table]\nsource = \"ip-neigh\"\n")
        .unwrap();
    file.flush().unwrap();

    let overrides = CliOverrides {
        interface: Some("eth1".to_string()),
        scanner: Some(ScannerKind::Ping),
        targets: None,
        log_level: Some("debug".to_string()),
    };
    let config = Config::load(file.path().to_str(), overrides).unwrap();

    assert_eq!(config.table.source, TableSourceKind::IpNeigh);
    assert_eq!(config.network.interface.as_deref(), Some("eth1"));
    assert_eq!(config.scanner.kind, ScannerKind::Ping);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_missing_file_fails() {
    let result = Config::load(Some("/nonexistent/macresolve.toml"), CliOverrides::default());
    assert!(result.is_err());
}

#[test]
fn test_scanner_kind_from_str() {
    assert_eq!("nmap".parse::<ScannerKind>().unwrap(), ScannerKind::Nmap);
    assert_eq!("ARP-SCAN".parse::<ScannerKind>().unwrap(), ScannerKind::ArpScan);
    assert!("telnet".parse::<ScannerKind>().is_err());
}
