use std::collections::{HashSet, VecDeque};

/// Most ids a persisted seen-set may hold
pub const SEEN_CAPACITY: usize = 2000;

/// Deduplication ledger of post ids, remembering insertion order.
///
/// Eviction drops the earliest-inserted ids first. Re-inserting a known id
/// does not refresh its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    order: VecDeque<String>,
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.insert(id.clone());
        self.order.push_back(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop the oldest-inserted ids until at most `capacity` remain
    pub fn truncate_oldest(&mut self, capacity: usize) {
        while self.order.len() > capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
    }

    /// Ids in insertion order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = SeenSet::new();
        for id in iter {
            seen.insert(id);
        }
        seen
    }
}
