//! Query Cache
//!
//! Pages keyed by [`ListQuery`], fresh for a staleness window. Each resource
//! carries an epoch that is bumped on invalidation; a fetch that started in
//! an older epoch may not write its result.

use std::collections::HashMap;
use std::rc::Rc;

use super::key::ListQuery;
use super::page::ListPage;
use crate::api::ResourceKind;

/// Entries older than this many staleness windows are pruned on insert
const RETAIN_WINDOWS: f64 = 10.0;
const MIN_RETAIN_MS: f64 = 60_000.0;
/// Hard cap; the oldest entries go first
pub const MAX_ENTRIES: usize = 256;

pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// `Date.now()`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

struct Entry {
    page: Rc<ListPage>,
    fetched_at: f64,
}

pub struct QueryCache {
    entries: HashMap<ListQuery, Entry>,
    epochs: HashMap<ResourceKind, u64>,
    stale_time_ms: f64,
}

impl QueryCache {
    pub fn new(stale_time_ms: f64) -> Self {
        Self {
            entries: HashMap::new(),
            epochs: HashMap::new(),
            stale_time_ms,
        }
    }

    /// Entry younger than the staleness window
    pub fn get_fresh(&self, key: &ListQuery, now: f64) -> Option<Rc<ListPage>> {
        self.entries
            .get(key)
            .filter(|e| now - e.fetched_at < self.stale_time_ms)
            .map(|e| e.page.clone())
    }

    /// Entry regardless of age
    pub fn get_any(&self, key: &ListQuery) -> Option<Rc<ListPage>> {
        self.entries.get(key).map(|e| e.page.clone())
    }

    pub fn epoch(&self, resource: ResourceKind) -> u64 {
        self.epochs.get(&resource).copied().unwrap_or(0)
    }

    /// Store a page fetched during `epoch`. Returns false if the resource was
    /// invalidated since.
    pub fn insert(&mut self, key: ListQuery, page: Rc<ListPage>, now: f64, epoch: u64) -> bool {
        if self.epoch(key.resource) != epoch {
            return false;
        }
        self.prune(now);
        self.entries.insert(key, Entry { page, fetched_at: now });
        true
    }

    fn prune(&mut self, now: f64) {
        let retain_ms = (self.stale_time_ms * RETAIN_WINDOWS).max(MIN_RETAIN_MS);
        self.entries.retain(|_, e| now - e.fetched_at < retain_ms);

        let excess = (self.entries.len() + 1).saturating_sub(MAX_ENTRIES);
        if excess == 0 {
            return;
        }
        let mut by_age: Vec<(f64, ListQuery)> = self
            .entries
            .iter()
            .map(|(k, e)| (e.fetched_at, k.clone()))
            .collect();
        by_age.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (_, key) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        log::debug!("[CACHE] evicted {} pages over the cap", excess);
    }

    /// Drop every page of `resource`; returns how many were removed
    pub fn invalidate(&mut self, resource: ResourceKind) -> usize {
        *self.epochs.entry(resource).or_insert(0) += 1;
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource != resource);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
pub mod testing {
    use super::Clock;
    use std::cell::Cell;

    #[derive(Default)]
    pub struct ManualClock {
        now: Cell<f64>,
    }

    impl ManualClock {
        pub fn advance(&self, ms: f64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> f64 {
            self.now.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u64) -> Rc<ListPage> {
        Rc::new(ListPage { data: Vec::new(), total_count: n, total_pages: 1 })
    }

    #[test]
    fn test_fresh_until_window_elapses() {
        let mut cache = QueryCache::new(1_000.0);
        let key = ListQuery::new(ResourceKind::Course);
        assert!(cache.insert(key.clone(), page(1), 0.0, 0));

        assert!(cache.get_fresh(&key, 999.0).is_some());
        assert!(cache.get_fresh(&key, 1_000.0).is_none());
        assert!(cache.get_any(&key).is_some());
    }

    #[test]
    fn test_invalidate_is_per_resource() {
        let mut cache = QueryCache::new(1_000.0);
        let course = ListQuery::new(ResourceKind::Course);
        let lesson = ListQuery::new(ResourceKind::Lesson);
        cache.insert(course.clone(), page(1), 0.0, 0);
        cache.insert(course.next_page(), page(1), 0.0, 0);
        cache.insert(lesson.clone(), page(1), 0.0, 0);

        assert_eq!(cache.invalidate(ResourceKind::Course), 2);
        assert!(cache.get_any(&course).is_none());
        assert!(cache.get_any(&lesson).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_long_expired_pages_are_pruned_on_insert() {
        let mut cache = QueryCache::new(10_000.0);
        let old = ListQuery::new(ResourceKind::Course);
        let recent = ListQuery::new(ResourceKind::Lesson);
        cache.insert(old.clone(), page(1), 0.0, 0);
        cache.insert(recent.clone(), page(1), 90_000.0, 0);

        // still kept as stale data for display
        assert!(cache.get_any(&old).is_some());

        cache.insert(ListQuery::new(ResourceKind::Badge), page(1), 100_000.0, 0);
        assert!(cache.get_any(&old).is_none());
        assert!(cache.get_any(&recent).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_entry_count_is_capped() {
        let mut cache = QueryCache::new(1_000.0);
        let base = ListQuery::new(ResourceKind::Problem);
        for n in 0..(MAX_ENTRIES as u32 + 20) {
            cache.insert(base.clone().page(n + 1), page(1), f64::from(n), 0);
        }

        assert_eq!(cache.len(), MAX_ENTRIES);
        assert!(cache.get_any(&base.clone().page(1)).is_none());
        assert!(cache.get_any(&base.page(MAX_ENTRIES as u32 + 20)).is_some());
    }

    #[test]
    fn test_write_from_older_epoch_is_dropped() {
        let mut cache = QueryCache::new(1_000.0);
        let key = ListQuery::new(ResourceKind::Badge);
        let started_in = cache.epoch(ResourceKind::Badge);
        cache.invalidate(ResourceKind::Badge);

        assert!(!cache.insert(key.clone(), page(1), 0.0, started_in));
        assert!(cache.get_any(&key).is_none());
    }
}
