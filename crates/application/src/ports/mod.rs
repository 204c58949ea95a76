mod address_table_source;
mod network_scanner;

pub use address_table_source::{AddressTableSource, NeighborStream};
pub use network_scanner::NetworkScanner;
