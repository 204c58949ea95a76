pub mod ip_neighbor;
pub mod proc_net_arp;

pub use ip_neighbor::IpNeighborTable;
pub use proc_net_arp::ProcNetArpTable;
