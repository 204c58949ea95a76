mod builder;
mod engine;

pub use builder::ResolutionEngineBuilder;
pub use engine::{EntryPredicate, ResolutionEngine};
