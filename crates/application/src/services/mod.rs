mod cancel_scope;
mod candidate_selector;
mod invalidation_tracker;
mod scan_scheduler;

pub use cancel_scope::CancelScope;
pub use candidate_selector::{CandidateSelector, Lookup, Verdict};
pub use invalidation_tracker::{InvalidationSet, InvalidationTracker};
pub use scan_scheduler::{ScanOutcome, ScanScheduler, SkipReason};
