//! # Least Recently Used (LRU) Cache
//!
//! Fixed-capacity associative container that evicts the entry that has gone
//! the longest without being accessed. All core operations are amortized O(1).
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                             │
//!   │                                                                    │
//!   │   ┌──────────────────────────────────────────────────────────┐    │
//!   │   │  FxHashMap<K, SlotId> (index into the recency list)      │    │
//!   │   │                                                          │    │
//!   │   │  ┌─────────┬──────────────────────────────────────┐      │    │
//!   │   │  │   Key   │  SlotId                              │      │    │
//!   │   │  ├─────────┼──────────────────────────────────────┤      │    │
//!   │   │  │  k_1    │  ──────────────────────────────────┐ │      │    │
//!   │   │  │  k_2    │  ────────────────────────────┐     │ │      │    │
//!   │   │  │  k_3    │  ──────────────────────┐     │     │ │      │    │
//!   │   │  └─────────┴────────────────────────┼─────┼─────┼─┘      │    │
//!   │   └───────────────────────────────────────────────────┼──────┘    │
//!   │                                         │     │     │             │
//!   │   ┌─────────────────────────────────────┼─────┼─────┼──────────┐  │
//!   │   │  RecencyList<Entry<K, V>>           ▼     ▼     ▼          │  │
//!   │   │                                                            │  │
//!   │   │  front ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── back   │  │
//!   │   │    (MRU)   │ k_3  │      │ k_2  │      │ k_1  │   (LRU)    │  │
//!   │   │            │ v_3  │      │ v_2  │      │ v_1  │            │  │
//!   │   │            └──────┘      └──────┘      └──────┘            │  │
//!   │   └────────────────────────────────────────────────────────────┘  │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries live in a [`SlotArena`](crate::ds::SlotArena) inside the recency
//! list; both the index and the list refer to them by [`SlotId`] handle, so
//! there is exactly one ownership path and no raw pointers anywhere.
//!
//! ## Operations
//!
//! | Method            | Complexity | Description                              |
//! |-------------------|------------|------------------------------------------|
//! | `try_new(cap)`    | O(1)       | Fallible constructor, rejects cap = 0    |
//! | `new(cap)`        | O(1)       | Panicking constructor, rejects cap = 0   |
//! | `insert(k, v)`    | O(1)*      | Insert or update, may evict LRU          |
//! | `get(&k)`         | O(1)       | Get value, promotes to MRU               |
//! | `peek(&k)`        | O(1)       | Get value without affecting order        |
//! | `contains(&k)`    | O(1)       | Existence check, no promotion            |
//! | `remove(&k)`      | O(1)       | Remove entry by key                      |
//! | `pop_lru()`       | O(1)       | Remove and return the LRU entry          |
//! | `peek_lru()`      | O(1)       | Inspect the LRU entry without removal    |
//! | `touch(&k)`       | O(1)       | Promote to MRU without returning value   |
//! | `recency_rank()`  | O(n)       | Position in recency order (0 = MRU)      |
//! | `keys()` / `iter()` | O(n)     | MRU-to-LRU traversal                     |
//! | `len()` / `capacity()` | O(1)  | Entry count / fixed capacity             |
//! | `clear()`         | O(n)       | Remove all entries                       |
//!
//! ## Recency semantics
//!
//! ```text
//!   INSERT new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════
//!   before:  front ──► [A] ◄──► [B] ◄──► [C] ◄── back
//!   insert(D): evict [C], attach [D] at front
//!   after:   front ──► [D] ◄──► [A] ◄──► [B] ◄── back
//!
//!   GET existing key
//!   ═══════════════════════════════════════════════════════════════
//!   before:  front ──► [A] ◄──► [B] ◄──► [C] ◄── back
//!   get(B):  move [B] to front
//!   after:   front ──► [B] ◄──► [A] ◄──► [C] ◄── back
//!
//!   PEEK (no reordering)
//!   ═══════════════════════════════════════════════════════════════
//!   peek(C): returns &value, order unchanged
//! ```
//!
//! A successful `get` mutates the recency order even though it is logically
//! a read; this is part of the LRU contract. `peek` and `contains` are the
//! order-preserving alternatives.
//!
//! ## Invariants
//!
//! After every public operation:
//!
//! 1. `index.len() == list.len() <= capacity`.
//! 2. Every `SlotId` in the index resolves to a node holding that exact key.
//! 3. The list front is the most recently touched entry; the back is the
//!    unique eviction candidate.
//! 4. `capacity >= 1` (enforced at construction).
//!
//! Each mutation sequence (evict-then-insert, update-then-promote) completes
//! before the operation returns, so callers only ever observe state at
//! operation boundaries.
//!
//! ## Error handling
//!
//! A missing key is a `None`, never an error. The only error surface is
//! construction: `capacity == 0` is rejected by [`LruCache::try_new`] with a
//! [`ConfigError`] (and by [`LruCache::new`] with a panic) instead of
//! producing a cache that can never hold anything.
//!
//! ## Thread safety
//!
//! `LruCache` is a single-threaded ADT. It owns its entries exclusively;
//! callers receive `&V` borrows or moved-out values, never handles into the
//! internal structure.
//!
//! ## Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//! use lrukit::traits::{CoreCache, LruCacheTrait};
//!
//! let mut cache: LruCache<u32, &str> = LruCache::new(2);
//! cache.insert(1, "one");
//! cache.insert(2, "two");
//!
//! // get(1) promotes key 1, so key 2 becomes the eviction candidate
//! assert_eq!(cache.get(&1), Some(&"one"));
//! cache.insert(3, "three");
//!
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.get(&1), Some(&"one"));
//! assert_eq!(cache.get(&3), Some(&"three"));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::ConfigError;
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// One cached key/value pair, stored as a recency-list node payload.
///
/// The key is immutable once created; the value is replaced in place when the
/// same key is inserted again. The key copy here is what lets eviction remove
/// the matching index entry without a reverse lookup.
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LRU cache over a hash index and a handle-linked recency
/// list.
///
/// Keys are cloned once per inserted entry (one copy in the list node, one in
/// the index). Values are owned by the cache and moved out on removal or
/// eviction.
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given capacity.
    ///
    /// Returns a [`ConfigError`] if `capacity` is zero: a zero-capacity LRU
    /// cache could never hold an entry, so construction rejects it outright
    /// rather than producing a silently-broken instance.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache = LruCache::<u64, String>::try_new(100);
    /// assert!(cache.is_ok());
    ///
    /// let err = LruCache::<u64, String>::try_new(0).unwrap_err();
    /// assert!(err.to_string().contains("capacity"));
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be at least 1"));
        }
        Ok(LruCache {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: RecencyList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Creates a cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to handle
    /// the error instead.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    /// use lrukit::traits::CoreCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("LruCache::new: {err}"),
        }
    }

    /// Read-only lookup that does not promote the entry.
    ///
    /// Unlike [`get`](CoreCache::get), a `peek` hit leaves the recency order
    /// untouched, so the entry remains as close to eviction as it was.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    /// use lrukit::traits::CoreCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    ///
    /// // Key 1 is still the LRU entry and gets evicted next
    /// cache.insert(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let &id = self.index.get(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Iterates over keys from most to least recently used.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    /// use lrukit::traits::CoreCache;
    ///
    /// let mut cache = LruCache::new(3);
    /// cache.insert(1, "a");
    /// cache.insert(2, "b");
    /// cache.insert(3, "c");
    /// cache.get(&1);
    ///
    /// let keys: Vec<u32> = cache.keys().copied().collect();
    /// assert_eq!(keys, vec![1, 3, 2]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Iterates over `(key, value)` pairs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates the index/list coupling and the recency-list links.
    ///
    /// O(n); intended for tests and debug builds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} entries but list has {}",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new("index maps key to a node holding a different key"));
                },
                None => {
                    return Err(InvariantError::new("index maps key to a freed slot"));
                },
            }
        }
        self.list.check_invariants()
    }

    #[cfg(debug_assertions)]
    fn validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("LruCache invariant violated: {err}");
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts or updates an entry, returning the previous value for an
    /// existing key.
    ///
    /// Updating an existing key replaces the value in place and promotes the
    /// entry; it never changes `len()` and never evicts. A new key at
    /// capacity first evicts the LRU entry, then inserts at the MRU position.
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            // The index and list are updated in lockstep, so a mapped id
            // always resolves to a live node.
            let entry = self
                .list
                .get_mut(id)
                .expect("index maps to a live list node");
            let previous = std::mem::replace(&mut entry.value, value);
            self.list.move_to_front(id);

            #[cfg(debug_assertions)]
            self.validate_invariants();

            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() >= self.capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            if let Some(evicted) = self.list.pop_back() {
                self.index.remove(&evicted.key);
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            }
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        None
    }

    /// Looks up a value and promotes the entry to the MRU position.
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        self.list.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.list.clear();

        #[cfg(debug_assertions)]
        self.validate_invariants();
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;

        #[cfg(debug_assertions)]
        self.validate_invariants();

        Some(entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some((entry.key, entry.value))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        let entry = self.list.back()?;
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_found();
        Some((&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        if let Some(&id) = self.index.get(key) {
            self.list.move_to_front(id);

            #[cfg(debug_assertions)]
            self.validate_invariants();

            #[cfg(feature = "metrics")]
            self.metrics.record_touch_found();

            true
        } else {
            false
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_call();

        for (rank, entry) in self.list.iter().enumerate() {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_rank_scan_step();

            if entry.key == *key {
                #[cfg(feature = "metrics")]
                self.metrics.record_recency_rank_found();
                return Some(rank);
            }
        }
        None
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Returns a point-in-time copy of the operation counters.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            recency_rank_calls: self.metrics.recency_rank_calls.get(),
            recency_rank_found: self.metrics.recency_rank_found.get(),
            recency_rank_scan_steps: self.metrics.recency_rank_scan_steps.get(),
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn try_new_accepts_positive_capacity() {
            let cache = LruCache::<u32, u32>::try_new(10).unwrap();
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        }

        #[test]
        #[should_panic(expected = "capacity")]
        fn new_panics_on_zero_capacity() {
            let _ = LruCache::<u32, u32>::new(0);
        }

        #[test]
        fn capacity_one_is_valid() {
            let cache = LruCache::<u32, u32>::try_new(1).unwrap();
            assert_eq!(cache.capacity(), 1);
        }
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_then_get_round_trips() {
            let mut cache = LruCache::new(5);
            assert_eq!(cache.insert(1, 100), None);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn get_missing_key_returns_none() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);
            assert_eq!(cache.get(&2), None);
        }

        #[test]
        fn get_on_empty_cache_returns_none() {
            let mut cache: LruCache<u32, u32> = LruCache::new(5);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn insert_existing_key_returns_previous_value() {
            let mut cache = LruCache::new(5);
            assert_eq!(cache.insert(1, 100), None);
            assert_eq!(cache.insert(1, 200), Some(100));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&1), Some(&200));
        }

        #[test]
        fn insert_existing_key_never_evicts() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);

            // Full cache: updating key 1 must not disturb key 2
            cache.insert(1, 11);
            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&1));
            assert!(cache.contains(&2));
        }

        #[test]
        fn contains_does_not_promote() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);

            assert!(cache.contains(&1));
            cache.insert(3, 30);
            assert!(!cache.contains(&1));
        }

        #[test]
        fn remove_existing_key() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);
            assert_eq!(cache.remove(&1), Some(100));
            assert_eq!(cache.len(), 0);
            assert!(!cache.contains(&1));
        }

        #[test]
        fn remove_missing_key() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);
            assert_eq!(cache.remove(&2), None);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn remove_batch_preserves_input_order() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);

            let removed = cache.remove_batch(&[1, 99, 3]);
            assert_eq!(removed, vec![Some(10), None, Some(30)]);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn clear_empties_and_keeps_capacity() {
            let mut cache = LruCache::new(3);
            for i in 1..=3 {
                cache.insert(i, i * 10);
            }
            cache.clear();
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 3);
            for i in 1..=3 {
                assert_eq!(cache.get(&i), None);
            }
        }

        #[test]
        fn cache_is_usable_after_clear() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.clear();

            // Behaves like a freshly constructed cache with the same capacity
            cache.insert(3, 30);
            cache.insert(4, 40);
            cache.insert(5, 50);
            assert_eq!(cache.len(), 2);
            assert!(!cache.contains(&3));
            assert!(cache.contains(&4));
            assert!(cache.contains(&5));
        }

        #[test]
        fn clear_is_idempotent() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.clear();
            cache.clear();
            assert!(cache.is_empty());
        }

        #[test]
        fn operations_on_empty_cache() {
            let mut cache: LruCache<u32, u32> = LruCache::new(5);
            assert_eq!(cache.peek(&1), None);
            assert!(!cache.contains(&1));
            assert_eq!(cache.remove(&1), None);
            assert_eq!(cache.pop_lru(), None);
            assert_eq!(cache.peek_lru(), None);
            assert!(!cache.touch(&1));
            assert_eq!(cache.recency_rank(&1), None);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn lru_entry_is_evicted_first() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 100);
            cache.insert(2, 200);
            cache.insert(3, 300);

            assert_eq!(cache.len(), 2);
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
        }

        #[test]
        fn capacity_plus_one_inserts_evict_the_first_key() {
            let capacity = 3;
            let mut cache = LruCache::new(capacity);
            for i in 1..=(capacity as u32 + 1) {
                cache.insert(i, i);
                assert!(cache.len() <= capacity);
            }
            assert!(!cache.contains(&1));
            for i in 2..=(capacity as u32 + 1) {
                assert!(cache.contains(&i));
            }
        }

        #[test]
        fn get_promotion_protects_from_eviction() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 100);
            cache.insert(2, 200);
            cache.insert(3, 300);

            cache.get(&1);

            // Key 2 is now the LRU entry, not key 1
            cache.insert(4, 400);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
            assert!(cache.contains(&3));
            assert!(cache.contains(&4));
        }

        #[test]
        fn peek_does_not_protect_from_eviction() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 100);
            cache.insert(2, 200);

            assert_eq!(cache.peek(&1), Some(&100));
            cache.insert(3, 300);
            assert!(!cache.contains(&1));
        }

        #[test]
        fn touch_protects_from_eviction() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 100);
            cache.insert(2, 200);

            assert!(cache.touch(&1));
            cache.insert(3, 300);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn capacity_one_always_holds_latest() {
            let mut cache = LruCache::new(1);
            cache.insert(1, 10);
            cache.insert(2, 20);

            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.get(&2), Some(&20));
        }

        #[test]
        fn eviction_slot_is_reused() {
            let mut cache = LruCache::new(2);
            for i in 0..100u32 {
                cache.insert(i, i);
                assert!(cache.len() <= 2);
            }
            assert!(cache.contains(&98));
            assert!(cache.contains(&99));
            cache.check_invariants().unwrap();
        }
    }

    mod recency_order {
        use super::*;

        #[test]
        fn keys_run_from_mru_to_lru() {
            let mut cache = LruCache::new(3);
            cache.insert(1, "a");
            cache.insert(2, "b");
            cache.insert(3, "c");

            let keys: Vec<u32> = cache.keys().copied().collect();
            assert_eq!(keys, vec![3, 2, 1]);

            cache.get(&1);
            let keys: Vec<u32> = cache.keys().copied().collect();
            assert_eq!(keys, vec![1, 3, 2]);
        }

        #[test]
        fn iter_pairs_match_keys_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            let pairs: Vec<(u32, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(pairs, vec![(2, 20), (1, 10)]);
        }

        #[test]
        fn recency_rank_tracks_access_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, "a");
            cache.insert(2, "b");
            cache.insert(3, "c");

            assert_eq!(cache.recency_rank(&3), Some(0));
            assert_eq!(cache.recency_rank(&2), Some(1));
            assert_eq!(cache.recency_rank(&1), Some(2));
            assert_eq!(cache.recency_rank(&99), None);

            cache.get(&1);
            assert_eq!(cache.recency_rank(&1), Some(0));
            assert_eq!(cache.recency_rank(&3), Some(1));
        }

        #[test]
        fn update_promotes_entry() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);

            // Re-insert promotes key 1, so key 2 is evicted next
            cache.insert(1, 11);
            cache.insert(3, 30);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn pop_lru_drains_in_recency_order() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);
            cache.get(&1);

            assert_eq!(cache.pop_lru(), Some((2, 20)));
            assert_eq!(cache.pop_lru(), Some((3, 30)));
            assert_eq!(cache.pop_lru(), Some((1, 10)));
            assert_eq!(cache.pop_lru(), None);
            assert!(cache.is_empty());
        }

        #[test]
        fn peek_lru_does_not_remove_or_promote() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);

            assert_eq!(cache.peek_lru(), Some((&1, &10)));
            assert_eq!(cache.peek_lru(), Some((&1, &10)));
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn touch_missing_key_returns_false() {
            let mut cache: LruCache<u32, u32> = LruCache::new(2);
            cache.insert(1, 10);
            assert!(!cache.touch(&99));
        }
    }

    mod scripted_scenarios {
        use super::*;

        // Scripted scenarios exercising the full recency contract at small
        // capacities.

        #[test]
        fn capacity_two_promotion_script() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            assert_eq!(cache.get(&1), Some(&1));

            cache.insert(3, 3); // evicts key 2
            assert_eq!(cache.get(&2), None);
            assert_eq!(cache.get(&3), Some(&3));
            assert_eq!(cache.get(&1), Some(&1));
        }

        #[test]
        fn capacity_two_update_script() {
            let mut cache = LruCache::new(2);
            assert_eq!(cache.get(&2), None);
            cache.insert(2, 6);
            assert_eq!(cache.get(&1), None);
            cache.insert(1, 5);
            cache.insert(1, 2);
            assert_eq!(cache.get(&1), Some(&2));
            assert_eq!(cache.get(&2), Some(&6));
        }

        #[test]
        fn capacity_one_script() {
            let mut cache = LruCache::new(1);
            cache.insert(1, 10);
            cache.insert(2, 20); // evicts key 1
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.get(&2), Some(&20));
        }

        #[test]
        fn capacity_three_overflow_script() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);
            cache.insert(4, 4); // evicts key 1

            assert!(!cache.contains(&1));
            for k in 2..=4 {
                assert!(cache.contains(&k));
            }
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn invariants_hold_through_mixed_workload() {
            let mut cache = LruCache::new(4);
            for i in 0..32u32 {
                cache.insert(i % 7, i);
                cache.get(&(i % 5));
                if i % 3 == 0 {
                    cache.remove(&(i % 7));
                }
                if i % 11 == 0 {
                    cache.pop_lru();
                }
                cache.check_invariants().unwrap();
            }
        }

        #[test]
        fn invariants_hold_after_clear() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.clear();
            cache.check_invariants().unwrap();
        }
    }

    mod key_types {
        use super::*;

        #[test]
        fn string_keys_work() {
            let mut cache: LruCache<String, u32> = LruCache::new(2);
            cache.insert("one".to_string(), 1);
            cache.insert("two".to_string(), 2);
            cache.insert("three".to_string(), 3);

            assert!(!cache.contains(&"one".to_string()));
            assert_eq!(cache.get(&"two".to_string()), Some(&2));
            assert_eq!(cache.get(&"three".to_string()), Some(&3));
        }

        #[test]
        fn non_clone_values_are_moved_out() {
            struct Opaque(u32);

            let mut cache: LruCache<u32, Opaque> = LruCache::new(1);
            cache.insert(1, Opaque(7));
            let previous = cache.insert(1, Opaque(8)).unwrap();
            assert_eq!(previous.0, 7);

            let removed = cache.remove(&1).unwrap();
            assert_eq!(removed.0, 8);
        }
    }

    mod extend {
        use super::*;

        #[test]
        fn extend_applies_inserts_in_order() {
            let mut cache = LruCache::new(2);
            cache.extend(vec![(1, 10), (2, 20), (3, 30)]);
            assert_eq!(cache.len(), 2);
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn snapshot_counts_hits_misses_and_evictions() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(1, 11); // update
            cache.insert(3, 30); // evicts key 2
            cache.get(&1); // hit
            cache.get(&2); // miss
            cache.peek(&3);
            cache.touch(&1);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.peek_calls, 1);
            assert_eq!(snap.peek_found, 1);
            assert_eq!(snap.touch_calls, 1);
            assert_eq!(snap.touch_found, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }
    }
}
