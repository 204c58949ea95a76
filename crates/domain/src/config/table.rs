use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TableSourceKind {
    /// `/proc/net/arp` (IPv4 only)
    #[default]
    Procfs,
    /// `ip neigh show` (IPv4 and IPv6, with NUD states)
    IpNeigh,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableConfig {
    #[serde(default)]
    pub source: TableSourceKind,

    #[serde(default = "default_procfs_path")]
    pub procfs_path: String,

    #[serde(default = "default_ip_command")]
    pub ip_command: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            source: TableSourceKind::default(),
            procfs_path: default_procfs_path(),
            ip_command: default_ip_command(),
        }
    }
}

fn default_procfs_path() -> String {
    "/proc/net/arp".to_string()
}

fn default_ip_command() -> String {
    "ip".to_string()
}
