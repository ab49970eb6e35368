//! A set view over the table engine: unique values with first-wins insertion.

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

/// A hash set backed by the open-addressing [`HashTable`] engine.
///
/// `HashSet<T, S>` stores unique values that implement `Hash + Eq`. Insertion
/// is first-wins: inserting a value equal to one already present leaves the
/// stored value untouched and reports `false`. Iteration visits values most
/// recently inserted first.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashSet;
///
/// let mut set = HashSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
/// assert!(set.contains(&"a"));
/// assert_eq!(set.len(), 1);
/// ```
pub struct HashSet<
    T,
    S = DefaultHashBuilder,
    C = LinearProbing,
    R = MaskRangeHashing,
    P = Power2Rehash,
> {
    table: HashTable<T, C, R, P>,
    hash_builder: S,
}

impl<T, S, C, R, P> Debug for HashSet<T, S, C, R, P>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for value in self.table.iter() {
            set.entry(value);
        }
        set.finish()
    }
}

impl<T, S, C, R, P> Clone for HashSet<T, S, C, R, P>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<T, S, C, R, P> HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    /// Creates a new hash set with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash set that can hold at least `capacity` values
    /// without rehashing, using the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the set can hold before the rehash
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

    /// Removes all values, keeping the allocated bucket array.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the set, if needed, so that `additional` more values fit
    /// without rehashing.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was not already present. If an equal value
    /// is already stored, the set is unchanged: the stored value is kept and
    /// the new one is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |stored| *stored == value) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns `true` if the set contains the given value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |stored| stored == value)
    }

    /// Removes a value from the set. Returns `true` if it was present;
    /// removing an absent value is a no-op returning `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to the given value.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |stored| stored == value)
    }

    /// Returns an iterator over the values, most recently inserted first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert("old");
    /// set.insert("new");
    ///
    /// let values: Vec<_> = set.iter().collect();
    /// assert_eq!(values, [&"new", &"old"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values, most recently
    /// inserted first. Dropping the iterator empties the set.
    pub fn drain(&mut self) -> Drain<'_, T, C, R, P> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T> HashSet<T> {
    /// Creates a new hash set using the default hasher builder and policies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new hash set that can hold at least `capacity` values
    /// without rehashing, using the default hasher builder and policies.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder: DefaultHashBuilder::default(),
        }
    }
}

impl<T, S, C, R, P> Default for HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Two sets are equal when they have the same size and every value of the
/// left is present in the right. Insertion order, bucket layout, and policy
/// choice do not participate.
impl<T, S, C, R, P> PartialEq for HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|value| other.contains(value))
    }
}

impl<T, S, C, R, P> Eq for HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
}

impl<T, S, C, R, P> Extend<T> for HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S, C, R, P> FromIterator<T> for HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<'a, T, S, C, R, P> IntoIterator for &'a HashSet<T, S, C, R, P>
where
    T: Hash + Eq,
    S: BuildHasher,
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S, C, R, P> IntoIterator for HashSet<T, S, C, R, P> {
    type Item = T;
    type IntoIter = IntoIter<T, C, R, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// An iterator over the values of a [`HashSet`].
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// A draining iterator over the values of a [`HashSet`].
pub struct Drain<'a, T, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    inner: crate::hash_table::Drain<'a, T, C, R, P>,
}

impl<'a, T, C, R, P> Iterator for Drain<'a, T, C, R, P> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the values of a [`HashSet`].
pub struct IntoIter<T, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    inner: crate::hash_table::IntoIter<T, C, R, P>,
}

impl<T, C, R, P> Iterator for IntoIter<T, C, R, P> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
