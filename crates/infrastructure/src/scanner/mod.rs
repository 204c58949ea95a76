pub mod command;
pub mod ping;

pub use command::{CommandNetworkScanner, ScanTool};
pub use ping::PingNetworkScanner;
