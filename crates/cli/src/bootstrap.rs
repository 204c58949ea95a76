use anyhow::Context;
use macresolve_domain::{CliOverrides, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_applies_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[network]
interface = "eth0"

[logging]
level = "warn"
"#
        )
        .unwrap();

        let config = load_config(
            file.path().to_str(),
            CliOverrides {
                interface: Some("wlan0".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.network.interface.as_deref(), Some("wlan0"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[resolver]\nmax_parallel_refresh = 0").unwrap();

        let err = load_config(file.path().to_str(), CliOverrides::default()).unwrap_err();

        assert!(err.to_string().contains("Invalid configuration"));
    }
}
