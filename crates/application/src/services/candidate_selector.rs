use super::invalidation_tracker::InvalidationTracker;
use macresolve_domain::{MacAddress, NeighborEntry};
use std::net::IpAddr;
use tracing::trace;

/// Address a resolve call is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Ip(IpAddr),
    Mac(MacAddress),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep feeding entries.
    Continue,
    /// An authoritative entry was found; later entries cannot change the result.
    Decided,
}

/// Picks one entry out of a neighbor table stream.
///
/// Entries without a usable MAC, and entries whose complementary address is
/// invalidated, are ignored. The first permanent or reachable match wins outright;
/// otherwise the last match seen wins, since tables append fresher rows later.
/// Interface scoping happens upstream, while the stream is produced.
pub struct CandidateSelector<'a> {
    lookup: Lookup,
    tracker: &'a InvalidationTracker,
    candidate: Option<NeighborEntry>,
    decided: bool,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(lookup: Lookup, tracker: &'a InvalidationTracker) -> Self {
        Self {
            lookup,
            tracker,
            candidate: None,
            decided: false,
        }
    }

    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    pub fn is_eligible(&self, entry: &NeighborEntry) -> bool {
        let Some(mac) = entry.resolved_mac() else {
            return false;
        };

        match self.lookup {
            Lookup::Ip(target) => entry.ip == Some(target) && !self.tracker.macs.contains(&mac),
            Lookup::Mac(target) => {
                mac == target
                    && entry
                        .ip
                        .as_ref()
                        .is_some_and(|ip| !self.tracker.ips.contains(ip))
            }
        }
    }

    pub fn offer(&mut self, entry: NeighborEntry) -> Verdict {
        if self.decided {
            return Verdict::Decided;
        }

        if !self.is_eligible(&entry) {
            return Verdict::Continue;
        }

        trace!(
            ip = ?entry.ip,
            mac = ?entry.mac,
            state = %entry.state,
            permanent = entry.is_permanent,
            "Candidate entry"
        );

        self.decided = entry.is_authoritative();
        self.candidate = Some(entry);

        if self.decided {
            Verdict::Decided
        } else {
            Verdict::Continue
        }
    }

    pub fn finish(self) -> Option<NeighborEntry> {
        self.candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macresolve_domain::NeighborState;

    const TARGET: &str = "192.0.2.10";

    fn entry(mac: &str, state: NeighborState) -> NeighborEntry {
        NeighborEntry::new(TARGET.parse().unwrap(), Some(mac.parse().unwrap())).with_state(state)
    }

    fn select(entries: Vec<NeighborEntry>, tracker: &InvalidationTracker) -> Option<NeighborEntry> {
        let mut selector = CandidateSelector::new(Lookup::Ip(TARGET.parse().unwrap()), tracker);
        for entry in entries {
            if selector.offer(entry) == Verdict::Decided {
                break;
            }
        }
        selector.finish()
    }

    #[test]
    fn test_permanent_wins_regardless_of_position() {
        let tracker = InvalidationTracker::new();
        let b = entry("00:00:00:00:00:0b", NeighborState::Stale);
        let c = entry("00:00:00:00:00:0c", NeighborState::Stale);
        let a = entry("00:00:00:00:00:0a", NeighborState::Stale).with_permanent(true);

        assert_eq!(select(vec![b, c, a.clone()], &tracker), Some(a));
    }

    #[test]
    fn test_last_wins_among_equals() {
        let tracker = InvalidationTracker::new();
        let b = entry("00:00:00:00:00:0b", NeighborState::Stale);
        let c = entry("00:00:00:00:00:0c", NeighborState::Stale);

        assert_eq!(select(vec![b, c.clone()], &tracker), Some(c));
    }

    #[test]
    fn test_first_reachable_short_circuits() {
        let tracker = InvalidationTracker::new();
        let first = entry("00:00:00:00:00:01", NeighborState::Reachable);
        let second = entry("00:00:00:00:00:02", NeighborState::Reachable);

        let mut selector = CandidateSelector::new(Lookup::Ip(TARGET.parse().unwrap()), &tracker);
        assert_eq!(selector.offer(first.clone()), Verdict::Decided);
        assert_eq!(selector.offer(second), Verdict::Decided);
        assert_eq!(selector.finish(), Some(first));
    }

    #[test]
    fn test_unresolved_entries_are_ignored() {
        let tracker = InvalidationTracker::new();
        let unresolved = NeighborEntry::new(TARGET.parse().unwrap(), None)
            .with_state(NeighborState::Reachable);
        let zero = entry("00:00:00:00:00:00", NeighborState::Reachable);

        assert_eq!(select(vec![unresolved, zero], &tracker), None);
    }

    #[test]
    fn test_invalidated_mac_is_excluded_from_ip_lookup() {
        let tracker = InvalidationTracker::new();
        let only = entry("aa:bb:cc:dd:ee:ff", NeighborState::Reachable);
        tracker.macs.add("aa:bb:cc:dd:ee:ff".parse().unwrap());

        assert_eq!(select(vec![only], &tracker), None);
    }

    #[test]
    fn test_invalidated_ip_is_excluded_from_mac_lookup() {
        let tracker = InvalidationTracker::new();
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let kept = NeighborEntry::new("192.0.2.1".parse().unwrap(), Some(mac));
        let invalidated = NeighborEntry::new("192.0.2.2".parse().unwrap(), Some(mac));
        tracker.ips.add("192.0.2.2".parse().unwrap());

        let mut selector = CandidateSelector::new(Lookup::Mac(mac), &tracker);
        selector.offer(kept.clone());
        selector.offer(invalidated);

        assert_eq!(selector.finish(), Some(kept));
    }
}
