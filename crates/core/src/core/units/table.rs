//! Bounded Table with First-In, First-Out (FIFO) Eviction.
//!
//! A fixed-capacity associative store used by every prediction table. When a
//! new key arrives and the table is full, the oldest-inserted key is evicted
//! first, regardless of how recently it was read or overwritten.
//!
//! An eviction queue runs parallel to the map: every key in the map appears
//! exactly once in the queue, and the queue front is always the victim.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `put()`: O(1) amortized
//!   - `get()`: O(1)
//! - **Space Complexity:** O(C) where C is the configured capacity
//! - **Best Case:** Working sets that fit the capacity
//! - **Worst Case:** Cyclic key streams just larger than the capacity (every put evicts)

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Fixed-capacity key/value table with strict FIFO replacement.
#[derive(Debug, Clone)]
pub struct BoundedTable<K, V> {
    /// Stored values.
    entries: HashMap<K, V>,
    /// Keys in first-insertion order; front is the next victim.
    order: VecDeque<K>,
    /// Maximum number of entries.
    capacity: usize,
    /// Number of entries evicted since construction.
    evictions: u64,
}

impl<K, V> BoundedTable<K, V>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of entries. A capacity of zero is
    ///   raised to one so that the most recent insertion is always retained.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            evictions: 0,
        }
    }

    /// Inserts or overwrites `key`.
    ///
    /// Overwriting keeps the key's original queue position. Inserting a new
    /// key into a full table evicts the oldest-inserted key first.
    ///
    /// # Returns
    ///
    /// The evicted `(key, value)` pair, if the insertion forced an eviction.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.order.push_back(key);
        let _ = self.entries.insert(key, value);
        evicted
    }

    /// Looks up `key` without affecting eviction order.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is currently stored.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries evicted since construction.
    pub const fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Iterates over stored keys from oldest to newest insertion.
    pub fn iter_fifo(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    /// Removes the front of the eviction queue from both structures.
    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let victim = self.order.pop_front()?;
        let value = self.entries.remove(&victim)?;
        self.evictions += 1;
        Some((victim, value))
    }
}
