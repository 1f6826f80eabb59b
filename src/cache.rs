//! Process-local completion lists, invalidated explicitly after writes.
//!
//! The cache only stores what the database service hands it. A lookup after
//! invalidation misses, and the service rebuilds that target on demand.

use hashbrown::HashMap;
use tracing::debug;

use crate::types::{CompletionTarget, EntryKind};

/// Completion lists keyed by target.
#[derive(Debug, Default)]
pub struct CompletionCache {
    lists: HashMap<CompletionTarget, Vec<String>>,
    rebuilds: u64,
}

impl CompletionCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached list for `target`, if built since the last invalidation.
    pub fn get(&self, target: CompletionTarget) -> Option<&[String]> {
        self.lists.get(&target).map(Vec::as_slice)
    }

    /// True if `target` has a list.
    pub fn is_cached(&self, target: CompletionTarget) -> bool {
        self.lists.contains_key(&target)
    }

    /// Normalizes `values` (trimmed, sorted, distinct, no empties) and stores them.
    pub fn store(
        &mut self,
        target: CompletionTarget,
        values: impl IntoIterator<Item = String>,
    ) -> &[String] {
        let mut list: Vec<String> = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        list.sort_unstable();
        list.dedup();
        self.rebuilds += 1;
        debug!(?target, entries = list.len(), "completion list rebuilt");
        let slot = self.lists.entry(target).or_default();
        *slot = list;
        slot
    }

    /// Drops every target sourced from `kind`.
    pub fn invalidate_kind(&mut self, kind: EntryKind) {
        let before = self.lists.len();
        self.lists.retain(|target, _| !target.sources().contains(&kind));
        let dropped = before - self.lists.len();
        if dropped > 0 {
            debug!(%kind, dropped, "completion lists invalidated");
        }
    }

    /// Drops every list.
    pub fn invalidate_all(&mut self) {
        self.lists.clear();
    }

    /// Number of lists built so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_lists_are_normalized() {
        let mut cache = CompletionCache::new();
        let list = cache.store(
            CompletionTarget::Registrations,
            ["D-ABCD", "", "D-AAAA", " D-ABCD ", "  "].map(String::from),
        );
        assert_eq!(list, ["D-AAAA", "D-ABCD"]);
    }

    #[test]
    fn invalidation_follows_sources() {
        let mut cache = CompletionCache::new();
        cache.store(CompletionTarget::Companies, vec!["Lufthansa".to_string()]);
        cache.store(CompletionTarget::PilotNames, vec!["Doe, John".to_string()]);
        cache.store(CompletionTarget::AirportNames, vec!["Frankfurt".to_string()]);

        cache.invalidate_kind(EntryKind::Tail);
        assert!(!cache.is_cached(CompletionTarget::Companies));
        assert!(cache.is_cached(CompletionTarget::PilotNames));

        cache.invalidate_kind(EntryKind::Flight);
        assert!(cache.is_cached(CompletionTarget::AirportNames));

        cache.invalidate_all();
        assert_eq!(cache.get(CompletionTarget::AirportNames), None);
        assert_eq!(cache.rebuild_count(), 3);
    }
}
