pub mod resolver_maintenance;

pub use resolver_maintenance::ResolverMaintenanceJob;
