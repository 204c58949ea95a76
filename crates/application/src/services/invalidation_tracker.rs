use dashmap::DashSet;
use macresolve_domain::MacAddress;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;
use std::net::IpAddr;

/// Concurrent set of addresses whose cached mapping must not be trusted.
pub struct InvalidationSet<T: Eq + Hash> {
    inner: DashSet<T, FxBuildHasher>,
}

impl<T: Eq + Hash + Clone> InvalidationSet<T> {
    pub fn new() -> Self {
        Self {
            inner: DashSet::with_hasher(FxBuildHasher),
        }
    }

    /// Returns `false` when the address was already present.
    pub fn add(&self, value: T) -> bool {
        self.inner.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }

    pub fn remove(&self, value: &T) -> bool {
        self.inner.remove(value).is_some()
    }

    pub fn remove_all(&self, values: &[T]) {
        for value in values {
            self.inner.remove(value);
        }
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Point-in-time copy, in no particular order.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.iter().map(|item| item.key().clone()).collect()
    }
}

impl<T: Eq + Hash + Clone> Default for InvalidationSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct InvalidationTracker {
    pub ips: InvalidationSet<IpAddr>,
    pub macs: InvalidationSet<MacAddress>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty() && self.macs.is_empty()
    }

    pub fn clear(&self) {
        self.ips.clear();
        self.macs.clear();
    }
}
