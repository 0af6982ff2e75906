use std::collections::{HashMap, hash_map};
use std::hash::Hash;
use std::ops::Index;
use std::sync::Arc;

use slab::Slab;
use solidmath::{IndexNewtype, IndexOverflow};

/// Data structure that assigns an ID to each unique element inserted into it
/// and allows efficient lookups in both directions.
///
/// Values are stored behind [`Arc`] so that they can be handed out without
/// holding a lock on the map.
#[derive(Debug, Clone)]
pub struct SlabMap<I, T> {
    /// Flat array of values.
    slab: Slab<Arc<T>>,
    /// Hashmap to convert from value to ID.
    hashmap: HashMap<Arc<T>, I>,
}
impl<I, T> Default for SlabMap<I, T> {
    fn default() -> Self {
        Self {
            slab: Slab::new(),
            hashmap: HashMap::new(),
        }
    }
}
impl<I: IndexNewtype, T> Index<I> for SlabMap<I, T> {
    type Output = Arc<T>;

    fn index(&self, index: I) -> &Self::Output {
        &self.slab[index.to_usize()]
    }
}
impl<I: IndexNewtype, T: Hash + Eq> SlabMap<I, T> {
    /// Constructs an empty `SlabMap`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of values in the map.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    /// Iterates over the IDs of all values in the map.
    pub fn keys(&self) -> impl Iterator<Item = I> {
        self.hashmap.values().copied()
    }

    /// Removes a value from the map, returning it if it was present. Its ID
    /// may be reused by a later insertion.
    pub fn remove(&mut self, index: I) -> Option<Arc<T>> {
        let value = self.slab.try_remove(index.to_usize())?;
        self.hashmap.remove(&*value);
        Some(value)
    }

    /// Returns the ID for a value, adding it to the map and assigning it an ID
    /// if it doesn't already have one.
    pub fn get_or_insert(&mut self, value: T) -> Result<SlabMapEntry<I>, IndexOverflow> {
        match self.hashmap.entry(Arc::new(value)) {
            hash_map::Entry::Occupied(e) => Ok(SlabMapEntry::Old(*e.get())),
            hash_map::Entry::Vacant(e) => {
                let index = I::try_from_usize(self.slab.vacant_key())?;
                self.slab.insert(Arc::clone(e.key()));
                Ok(SlabMapEntry::New(*e.insert(index)))
            }
        }
    }
}

/// Result of [`SlabMap::get_or_insert()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlabMapEntry<I> {
    /// The value was newly inserted.
    New(I),
    /// The value was already present.
    Old(I),
}
impl<I: IndexNewtype> SlabMapEntry<I> {
    /// Returns the automatically-assigned key for the entry.
    pub fn key(self) -> I {
        match self {
            SlabMapEntry::New(index) => index,
            SlabMapEntry::Old(index) => index,
        }
    }
    /// Returns `true` if the value is new and `false` if the value was already
    /// present.
    pub fn is_new(self) -> bool {
        match self {
            SlabMapEntry::New(_) => true,
            SlabMapEntry::Old(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    solidmath::idx_struct! {
        struct TestId(u8);
    }

    #[test]
    fn test_slabmap_dedup() {
        let mut map = SlabMap::<TestId, String>::new();
        let a = map.get_or_insert("a".to_owned()).unwrap();
        let b = map.get_or_insert("b".to_owned()).unwrap();
        let a2 = map.get_or_insert("a".to_owned()).unwrap();
        assert!(a.is_new() && b.is_new() && !a2.is_new());
        assert_eq!(a.key(), a2.key());
        assert_eq!(*map[b.key()], "b");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_slabmap_overflow() {
        let mut map = SlabMap::<TestId, u32>::new();
        for i in 0..256 {
            map.get_or_insert(i).unwrap();
        }
        assert!(map.get_or_insert(256).is_err());
        assert!(!map.get_or_insert(3).unwrap().is_new());
    }

    #[test]
    fn test_slabmap_remove() {
        let mut map = SlabMap::<TestId, String>::new();
        let a = map.get_or_insert("a".to_owned()).unwrap().key();
        let b = map.get_or_insert("b".to_owned()).unwrap().key();
        assert_eq!(map.remove(a).as_deref().map(String::as_str), Some("a"));
        assert!(map.remove(a).is_none());
        assert_eq!(map.len(), 1);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![b]);

        // The freed ID is reused, and the removed value is no longer deduped.
        let c = map.get_or_insert("a".to_owned()).unwrap();
        assert!(c.is_new());
        assert_eq!(c.key(), a);
    }
}
