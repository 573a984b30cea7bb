//! StringTable: open-addressing hash table from owned string keys to values.
//!
//! Collisions are resolved by linear probing with step 1, wrapping at the end
//! of the slot array. Removal leaves a tombstone so entries further down the
//! same probe run stay reachable. Growth doubles the array and drops all
//! tombstones.

use crate::alloc;
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::hasher::{hash_str, Djb2BuildHasher};
use crate::slot::Slot;
use core::fmt;
use core::hash::BuildHasher;
use core::mem;
use log::{debug, trace, warn};

/// Outcome of [`StringTable::insert`].
#[must_use = "a rejected insert hands the value back"]
#[derive(Debug, PartialEq, Eq)]
pub enum Insert<V> {
    /// The key was new; `len` grew by one.
    Inserted,
    /// The key was present; this is the value it held before.
    Replaced(V),
    /// Nothing changed. The value is returned to the caller.
    Rejected { value: V, error: Error },
}

impl<V> Insert<V> {
    /// True unless the insert was rejected.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Insert::Rejected { .. })
    }

    /// The previous value, if the key was already present.
    pub fn replaced(self) -> Option<V> {
        match self {
            Insert::Replaced(old) => Some(old),
            _ => None,
        }
    }
}

// Result of walking a key's probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Found(usize),
    // First tombstone on the run, else the Empty slot that ended it.
    Vacant(usize),
    // Every slot is occupied by some other key.
    Full,
}

#[inline]
fn home_index<S: BuildHasher>(hasher: &S, key: &str, capacity: usize) -> usize {
    (hash_str(hasher, key) % capacity as u64) as usize
}

#[inline]
fn next_index(i: usize, capacity: usize) -> usize {
    if i + 1 == capacity {
        0
    } else {
        i + 1
    }
}

pub struct StringTable<V, S = Djb2BuildHasher> {
    slots: Vec<Slot<V>>,
    len: usize,
    config: TableConfig,
    hasher: S,
}

impl<V> StringTable<V> {
    /// A table with the default configuration and the minimum capacity.
    ///
    /// Allocates through the infallible path, like `Vec::with_capacity`.
    pub fn new() -> Self {
        let config = TableConfig::default();
        let slots = (0..config.min_capacity).map(|_| Slot::Empty).collect();
        Self {
            slots,
            len: 0,
            config,
            hasher: Djb2BuildHasher,
        }
    }

    /// Create a table with room for `capacity` slots (at least
    /// [`MIN_CAPACITY`](crate::MIN_CAPACITY)).
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config_and_hasher(capacity, TableConfig::default(), Djb2BuildHasher)
    }

    pub fn with_config(capacity: usize, config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(capacity, config, Djb2BuildHasher)
    }
}

impl<V> Default for StringTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> StringTable<V, S>
where
    S: BuildHasher,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        Self::with_config_and_hasher(capacity, TableConfig::default(), hasher)
    }

    /// Validate `config`, clamp `capacity` and allocate the slot array.
    /// On failure nothing stays allocated.
    pub fn with_config_and_hasher(capacity: usize, config: TableConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        let capacity = config.clamp_capacity(capacity);
        let slots = alloc::try_slots(capacity)?;
        trace!("created string table with {} slots", capacity);
        Ok(Self {
            slots,
            len: 0,
            config,
            hasher,
        })
    }

    /// Number of live entries. Tombstones are not counted.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, live or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn slots_for_test(&self) -> &[Slot<V>] {
        &self.slots
    }

    // Walk the probe run of `key` from its home index. Tombstones are probed
    // through; the walk is bounded by one lap of the array.
    fn probe(&self, key: &str) -> Probe {
        let capacity = self.capacity();
        let mut i = home_index(&self.hasher, key, capacity);
        let mut tombstone = None;
        for _ in 0..capacity {
            match &self.slots[i] {
                Slot::Empty => return Probe::Vacant(tombstone.unwrap_or(i)),
                Slot::Tombstone => {
                    tombstone.get_or_insert(i);
                }
                slot if slot.holds(key) => return Probe::Found(i),
                Slot::Occupied { .. } => {}
            }
            i = next_index(i, capacity);
        }
        match tombstone {
            Some(t) => Probe::Vacant(t),
            None => Probe::Full,
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(i) => Some(i),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let i = self.find(key)?;
        self.slots[i].entry().map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.find(key)?;
        match &mut self.slots[i] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Insert `value` under a copy of `key`, replacing any previous value.
    ///
    /// A new key first makes sure the table stays under its load threshold,
    /// growing if needed. Growth that cannot be allocated is skipped and the
    /// insert proceeds at the current capacity. The insert is rejected, with
    /// the table unchanged, if the key buffer cannot be allocated or no slot
    /// is vacant.
    pub fn insert(&mut self, key: &str, value: V) -> Insert<V> {
        let first = match self.probe(key) {
            Probe::Found(i) => return self.replace_at(i, value),
            vacancy => vacancy,
        };
        let vacancy = if self.make_room() {
            self.probe(key)
        } else {
            first
        };

        let index = match vacancy {
            Probe::Vacant(i) => i,
            Probe::Found(i) => return self.replace_at(i, value),
            Probe::Full => {
                let error = Error::TableFull {
                    capacity: self.capacity(),
                };
                warn!("insert rejected: {}", error);
                return Insert::Rejected { value, error };
            }
        };

        let key = match alloc::try_copy_key(key) {
            Ok(k) => k,
            Err(error) => {
                warn!("insert rejected: {}", error);
                return Insert::Rejected { value, error };
            }
        };
        self.slots[index] = Slot::Occupied { key, value };
        self.len += 1;
        Insert::Inserted
    }

    fn replace_at(&mut self, index: usize, value: V) -> Insert<V> {
        match &mut self.slots[index] {
            Slot::Occupied { value: old, .. } => Insert::Replaced(mem::replace(old, value)),
            _ => unreachable!("probe matched a slot that is not occupied"),
        }
    }

    // Grow until one more entry keeps the table under its threshold.
    // Returns whether the slot array changed.
    fn make_room(&mut self) -> bool {
        let mut grew = false;
        while self.config.over_threshold(self.len + 1, self.capacity()) {
            match self.grow() {
                Ok(()) => grew = true,
                Err(err) => {
                    warn!(
                        "growth skipped at {} slots with {} entries: {}",
                        self.capacity(),
                        self.len,
                        err
                    );
                    break;
                }
            }
        }
        grew
    }

    // Double the slot array and move every live entry into it. The new array
    // is allocated before the old one is touched, so failure changes nothing.
    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let capacity = old_capacity
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow {
                capacity: old_capacity,
            })?;
        let mut fresh = alloc::try_slots(capacity)?;

        let old = mem::take(&mut self.slots);
        for (key, value) in old.into_iter().filter_map(Slot::into_entry) {
            let mut i = home_index(&self.hasher, &key, capacity);
            while !fresh[i].is_empty() {
                i = next_index(i, capacity);
            }
            fresh[i] = Slot::Occupied { key, value };
        }
        self.slots = fresh;

        debug!(
            "grew string table from {} to {} slots ({} entries)",
            old_capacity, capacity, self.len
        );
        Ok(())
    }

    /// Remove `key`, leaving a tombstone in its slot.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.find(key)?;
        let (_key, value) = self.slots[i].bury()?;
        self.len -= 1;
        Some(value)
    }
}

impl<V, S> StringTable<V, S> {
    /// Entries in slot-index order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Call `visitor` on each entry in slot-index order until it returns
    /// `false`. Returns how many entries were visited, counting the one that
    /// stopped the walk.
    pub fn for_each<F>(&self, mut visitor: F) -> usize
    where
        F: FnMut(&str, &V) -> bool,
    {
        let mut visited = 0;
        for (key, value) in self.iter() {
            visited += 1;
            if !visitor(key, value) {
                break;
            }
        }
        visited
    }

    /// Release the table. Values are dropped like any other owned data; a
    /// table of borrowed values releases nothing of the caller's.
    pub fn destroy(self) {
        drop(self);
    }

    /// Release the table, handing each surviving value to `destructor`
    /// exactly once, in slot-index order.
    pub fn destroy_with<F>(self, mut destructor: F)
    where
        F: FnMut(V),
    {
        for (_key, value) in self {
            destructor(value);
        }
    }
}

impl<V: fmt::Debug, S> fmt::Debug for StringTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over `(key, value)` in slot-index order.
pub struct Iter<'a, V> {
    it: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// Owning iterator over `(key, value)` in slot-index order.
pub struct IntoIter<V> {
    it: std::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (Box<str>, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.it.by_ref().find_map(Slot::into_entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<'a, V, S> IntoIterator for &'a StringTable<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, S> IntoIterator for StringTable<V, S> {
    type Item = (Box<str>, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            it: self.slots.into_iter(),
        }
    }
}
