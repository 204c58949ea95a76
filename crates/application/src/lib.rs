//! macresolve application layer: collaborator ports and the resolution engine.
pub mod ports;
pub mod resolver;
pub mod services;

pub use resolver::{EntryPredicate, ResolutionEngine, ResolutionEngineBuilder};
pub use services::{ScanOutcome, SkipReason};
