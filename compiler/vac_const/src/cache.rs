//! Content-addressed deduplication of frozen constants.

use dashmap::DashMap;
use tracing::trace;

use crate::ConstValue;

/// Maps every content-equal constant to one canonical shared instance.
///
/// Safe to share between threads compiling different units: entries are
/// frozen values and the map shards its own locking.
#[derive(Default)]
pub struct ConstCache {
    entries: DashMap<ConstValue, ()>,
}

impl ConstCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical instance content-equal to `value`, inserting
    /// `value` itself if no such instance exists yet.
    pub fn intern(&self, value: ConstValue) -> ConstValue {
        let entry = self.entries.entry(value).or_insert(());
        let canonical = entry.key().clone();
        trace!(kind = canonical.kind_name(), "constant interned");
        canonical
    }

    pub fn contains(&self, value: &ConstValue) -> bool {
        self.entries.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
