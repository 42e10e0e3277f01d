//! LRU Arena Module
//!
//! Recency-ordered slot arena backing the bounded cache.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

// == Slot ==
/// A single cached entry, linked to its neighbours by slot index.
#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    /// Next more recently used slot
    prev: Option<usize>,
    /// Next less recently used slot
    next: Option<usize>,
}

// == LRU Arena ==
/// Fixed-capacity map ordered by recency of access.
///
/// Slots live in a `Vec` and link to each other by index:
/// - `head` = Most recently used
/// - `tail` = Least recently used
///
/// The arena never holds more than `capacity` slots. Once full, inserting a
/// new key reuses the tail slot in place, so slot indices stay stable and no
/// slot is ever freed.
///
/// Not synchronized; see [`crate::cache::BoundedCache`] for the shared wrapper.
#[derive(Debug)]
pub struct LruArena<K, V> {
    slots: Vec<Slot<K, V>>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: NonZeroUsize,
}

impl<K, V> LruArena<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty arena holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            capacity,
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.slots[idx].value)
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency.
    #[cfg(test)]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| &self.slots[idx].value)
    }

    // == Put ==
    /// Inserts or overwrites `key` and marks it most recently used.
    ///
    /// Returns the evicted `(key, value)` when the insertion pushed the arena
    /// past capacity. Overwrites never evict.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.slots[idx].value = value;
            self.move_to_front(idx);
            return None;
        }

        if self.slots.len() < self.capacity.get() {
            let idx = self.slots.len();
            self.slots.push(Slot {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key, idx);
            self.push_front(idx);
            return None;
        }

        // Full: recycle the least recently used slot
        let idx = self.evict_tail()?;
        let slot = &mut self.slots[idx];
        let old_key = std::mem::replace(&mut slot.key, key.clone());
        let old_value = std::mem::replace(&mut slot.value, value);
        self.index.insert(key, idx);
        self.push_front(idx);
        Some((old_key, old_value))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.tail.map(|idx| &self.slots[idx].key)
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.slots.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(&self.slots[idx].key);
            cursor = self.slots[idx].next;
        }
        keys
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub(crate) fn capacity_non_zero(&self) -> NonZeroUsize {
        self.capacity
    }

    // == Link Maintenance ==

    /// Unlinks the tail slot and drops it from the index. The slot itself
    /// stays in the arena for reuse.
    fn evict_tail(&mut self) -> Option<usize> {
        let idx = self.tail?;
        self.detach(idx);
        self.index.remove(&self.slots[idx].key);
        Some(idx)
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.push_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        let slot = &mut self.slots[idx];
        slot.prev = None;
        slot.next = None;
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[idx];
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(h) = old_head {
            self.slots[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}
