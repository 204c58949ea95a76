pub mod errors;
pub mod logging;
pub mod maintenance;
pub mod network;
pub mod resolver;
pub mod root;
pub mod scanner;
pub mod table;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use maintenance::MaintenanceConfig;
pub use network::NetworkConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use scanner::{ScannerConfig, ScannerKind};
pub use table::{TableConfig, TableSourceKind};
