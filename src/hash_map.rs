//! A map view over the table engine: key-value pairs keyed by `Hash + Eq`.

use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::policy::LinearProbing;
use crate::policy::MaskRangeHashing;
use crate::policy::Power2Rehash;
use crate::policy::ProbeSequence;
use crate::policy::RangeHash;
use crate::policy::RehashPolicy;

/// A hash map backed by the open-addressing [`HashTable`] engine.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq`, hashing them with a configurable [`BuildHasher`] `S`. The
/// remaining type parameters select the engine's probing, range-hashing, and
/// rehash policies. Every operation delegates to the engine; the map itself
/// contains no probing or list-splicing logic.
///
/// Iteration visits entries most recently inserted first and the relative
/// order of surviving entries is stable across removals of other entries.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(map.len(), 2);
/// ```
pub struct HashMap<
    K,
    V,
    S = DefaultHashBuilder,
    C = LinearProbing,
    R = MaskRangeHashing,
    P = Power2Rehash,
> {
    table: HashTable<(K, V), C, R, P>,
    hash_builder: S,
}

impl<K, V, S, C, R, P> Debug for HashMap<K, V, S, C, R, P>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.table.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S, C, R, P> Clone for HashMap<K, V, S, C, R, P>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S, C, R, P> HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    /// Creates a new hash map with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash map that can hold at least `capacity` entries
    /// without rehashing, using the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold before the rehash
    /// policy forces growth.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the underlying bucket array.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the current load factor.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the maximum load factor enforced by the rehash policy.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Removes all entries, keeping the allocated bucket array.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the map, if needed, so that `additional` more entries fit
    /// without rehashing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<u32, u32> = HashMap::new();
    /// map.reserve(500);
    /// assert!(map.capacity() >= 500);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was not present, `None` is returned. If it was, the value
    /// is overwritten in place and the old value is returned; the entry keeps
    /// its position in the traversal order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 2), Some(1));
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                Some(core::mem::replace(&mut entry.get_mut().1, value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the stored key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// if let Some(v) = map.get_mut(&1) {
    ///     *v = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the given key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning its value if it was present.
    /// Removing an absent key is a no-op returning `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's entry in the map for in-place manipulation.
    ///
    /// This is the get-or-create primitive: `entry(k).or_default()` behaves
    /// like indexing with default-construction on a miss, and
    /// `entry(k).or_insert(v)` inserts only if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.entry("a").or_insert(1);
    /// map.entry("a").or_insert(2);
    /// assert_eq!(map.get(&"a"), Some(&1));
    ///
    /// *map.entry("counter").or_default() += 1;
    /// assert_eq!(map.get(&"counter"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, R, P> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns an iterator over the key-value pairs, most recently inserted
    /// first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("old", 1);
    /// map.insert("new", 2);
    ///
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&"new", &2), (&"old", &1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys, most recently inserted first.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, most recently inserted first.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs, most
    /// recently inserted first. Dropping the iterator empties the map.
    pub fn drain(&mut self) -> Drain<'_, K, V, C, R, P> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates a new hash map using the default hasher builder and policies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new hash map that can hold at least `capacity` entries
    /// without rehashing, using the default hasher builder and policies.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder: DefaultHashBuilder::default(),
        }
    }
}

impl<K, V, S, C, R, P> Default for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Two maps are equal when they have the same size and every entry of the
/// left is present in the right with an equal value. Bucket layout, policy
/// choice, and traversal order do not participate.
impl<K, V, S, C, R, P> PartialEq for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).is_some_and(|ov| *ov == *v))
    }
}

impl<K, V, S, C, R, P> Eq for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
}

/// Total-access indexing.
///
/// # Panics
///
/// Panics if the key is not present in the map; use
/// [`get`](HashMap::get) for fallible lookup.
impl<K, V, S, C, R, P> core::ops::Index<&K> for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S, C, R, P> Extend<(K, V)> for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S, C, R, P> FromIterator<(K, V)> for HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S, C, R, P> IntoIterator for &'a HashMap<K, V, S, C, R, P>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S, C, R, P> IntoIterator for HashMap<K, V, S, C, R, P> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, R, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// A view into a single entry in the map, which may be vacant or occupied.
///
/// Constructed by [`HashMap::entry`].
pub enum Entry<'a, K, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C, R, P>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C, R, P>),
}

impl<'a, K, V, C, R, P> Entry<'a, K, V, C, R, P> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from the closure if the entry is vacant and
    /// returns a mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential insert.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V, C, R, P> Entry<'a, K, V, C, R, P>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    entry: crate::hash_table::VacantEntry<'a, (K, V), C, R, P>,
    key: K,
}

impl<'a, K, V, C, R, P> VacantEntry<'a, K, V, C, R, P> {
    /// Gets a reference to the key that would be used when inserting.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V), C, R, P>,
}

impl<'a, K, V, C, R, P> OccupiedEntry<'a, K, V, C, R, P> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the key-value pairs of a [`HashMap`].
pub struct Drain<'a, K, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    inner: crate::hash_table::Drain<'a, (K, V), C, R, P>,
}

impl<'a, K, V, C, R, P> Iterator for Drain<'a, K, V, C, R, P> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the key-value pairs of a [`HashMap`].
pub struct IntoIter<K, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    inner: crate::hash_table::IntoIter<(K, V), C, R, P>,
}

impl<K, V, C, R, P> Iterator for IntoIter<K, V, C, R, P> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
