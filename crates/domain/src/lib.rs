//! macresolve domain layer
pub mod config;
pub mod errors;
pub mod mac_address;
pub mod neighbor;
pub mod network;
pub mod settings;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use mac_address::MacAddress;
pub use neighbor::{NeighborEntry, NeighborState};
pub use network::{NetworkInterface, NetworkProfile};
pub use settings::ResolverSettings;
