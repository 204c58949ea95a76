use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScannerKind {
    /// Table is only read, never actively refreshed
    #[default]
    None,
    Ping,
    Nmap,
    ArpScan,
}

impl ScannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerKind::None => "none",
            ScannerKind::Ping => "ping",
            ScannerKind::Nmap => "nmap",
            ScannerKind::ArpScan => "arp-scan",
        }
    }

    pub fn default_command(&self) -> Option<&'static str> {
        match self {
            ScannerKind::None => None,
            ScannerKind::Ping => Some("ping"),
            ScannerKind::Nmap => Some("nmap"),
            ScannerKind::ArpScan => Some("arp-scan"),
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ScannerKind::None),
            "ping" => Ok(ScannerKind::Ping),
            "nmap" => Ok(ScannerKind::Nmap),
            "arp-scan" | "arpscan" => Ok(ScannerKind::ArpScan),
            other => Err(format!("Unknown scanner kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub kind: ScannerKind,

    /// Overrides the tool path; empty uses the kind's default command.
    #[serde(default)]
    pub command: String,

    /// Per-probe timeout for the ping scanner.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Probes in flight at once for the ping scanner.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl ScannerConfig {
    pub fn command(&self) -> Option<&str> {
        if self.command.is_empty() {
            self.kind.default_command()
        } else {
            Some(self.command.as_str())
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            kind: ScannerKind::default(),
            command: String::new(),
            timeout_secs: default_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    1
}

fn default_max_concurrency() -> usize {
    32
}
