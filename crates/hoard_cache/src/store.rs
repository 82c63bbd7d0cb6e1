//! The capacity-bounded page store.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::entry::CacheEntry;
use crate::key::CacheKey;

struct Slot {
    entry: CacheEntry,
    last_used: u64,
}

struct Inner {
    capacity: usize,
    /// Monotonic recency marker; bumped on every lookup hit or insert.
    tick: u64,
    slots: HashMap<CacheKey, Slot>,
}

/// Fixed-capacity key→entry store with least-recently-used eviction.
///
/// Recency counts lookups and inserts, not origin freshness. The lock
/// lives inside the store so lookup and insert stay atomic with the
/// recency bookkeeping when connections are handled concurrently.
pub struct PageCache {
    inner: Mutex<Inner>,
}

impl PageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                capacity,
                tick: 0,
                slots: HashMap::new(),
            }),
        }
    }

    /// Returns a copy of the stored entry and marks it
    /// most-recently-used. `None` is a miss — a normal outcome, not
    /// an error.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut inner = self.inner.lock().ok()?;
        inner.tick += 1;
        let tick = inner.tick;

        match inner.slots.get_mut(key) {
            Some(slot) => {
                slot.last_used = tick;
                debug!(target: "hoard::cache", host = %key.host, path = %key.path, "Cache hit");
                Some(slot.entry.clone())
            }
            None => {
                debug!(target: "hoard::cache", host = %key.host, path = %key.path, "Cache miss");
                None
            }
        }
    }

    /// Stores or overwrites `entry` and marks it most-recently-used.
    /// When a new key would exceed capacity, exactly the slot with the
    /// oldest recency marker is evicted first.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if inner.capacity == 0 {
            return;
        }

        if !inner.slots.contains_key(&key) && inner.slots.len() >= inner.capacity {
            let victim = inner
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                debug!(
                    target: "hoard::cache",
                    host = %victim.host,
                    path = %victim.path,
                    "Evicting least-recently-used entry"
                );
                inner.slots.remove(&victim);
            }
        }

        inner.tick += 1;
        let tick = inner.tick;
        inner.slots.insert(
            key,
            Slot {
                entry,
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
