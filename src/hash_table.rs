//! The open-addressing table engine.
//!
//! [`HashTable`] stores values in a single contiguous slot array and resolves
//! collisions by walking a probe sequence supplied as a type parameter.
//! Erased slots leave tombstones behind so probe walks for other entries stay
//! intact, and every occupied slot is threaded onto an intrusive doubly-linked
//! list that records insertion recency: traversal starts at the most recently
//! inserted entry and follows `next` links toward the oldest. The links are
//! plain indices rather than references, so the slot array can be replaced
//! wholesale on rehash.
//!
//! The engine never hashes or compares keys itself: every operation takes a
//! precomputed hash and an equality predicate. [`HashMap`](crate::HashMap)
//! and [`HashSet`](crate::HashSet) are thin views over this type.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::policy::LinearProbing;
use crate::policy::MaskRangeHashing;
use crate::policy::Power2Rehash;
use crate::policy::ProbeSequence;
use crate::policy::RangeHash;
use crate::policy::RehashPolicy;

/// Sentinel index terminating the insertion-order list. Never a valid bucket
/// index: bucket counts are powers of two well below `usize::MAX`.
const END: usize = usize::MAX;

#[derive(Clone)]
struct Node<V> {
    /// Cached hash of the stored value. Rehashing re-buckets from this, so
    /// user hashing code never runs again after insertion.
    hash: u64,
    next: usize,
    prev: usize,
    value: V,
}

/// One cell of the bucket array.
///
/// A tombstone is a slot whose entry was erased but which must remain visible
/// to probe walks: another entry's probe sequence may have stepped over this
/// slot on its way to a later bucket, and turning it back into `Empty` would
/// cut that walk short. Tombstones become `Empty` again only when the whole
/// array is rebuilt (rehash) or reset (clear).
#[derive(Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(Node<V>),
}

impl<V> Slot<V> {
    #[inline(always)]
    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    #[inline(always)]
    fn node(&self) -> Option<&Node<V>> {
        match self {
            Slot::Occupied(node) => Some(node),
            _ => None,
        }
    }

    #[inline(always)]
    fn node_mut(&mut self) -> Option<&mut Node<V>> {
        match self {
            Slot::Occupied(node) => Some(node),
            _ => None,
        }
    }

    /// Takes the node out of an occupied slot, leaving a tombstone.
    #[inline(always)]
    fn take(&mut self) -> Option<Node<V>> {
        if !self.is_occupied() {
            return None;
        }
        match core::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(node) => Some(node),
            _ => None,
        }
    }
}

/// An opaque handle to an occupied slot.
///
/// Positions stay valid until the entry they reference is removed, the table
/// rehashes, or the table is cleared; removal of *other* entries never moves
/// a live slot. Using a stale position is not undefined behavior, since the
/// position APIs are bounds-checked and return `None` for vacant slots, but
/// the result is unspecified if the slot has since been reused.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos(usize);

/// An open-addressed hash table with policy-driven probing and
/// recency-ordered iteration.
///
/// Type parameters select the collision strategy `C`, the hash-to-bucket
/// mapping `R`, and the growth policy `P`; all three are zero-sized and
/// resolved at compile time. The defaults (linear probing, mask range
/// hashing, doubling growth at load factor 0.5) are the classic
/// power-of-two open-addressing setup.
///
/// # Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use probe_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_u64(n: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     n.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: HashTable<u64> = HashTable::new();
/// table.entry(hash_u64(7), |&v| v == 7).or_insert(7);
///
/// assert_eq!(table.find(hash_u64(7), |&v| v == 7), Some(&7));
/// assert_eq!(table.remove(hash_u64(7), |&v| v == 7), Some(7));
/// assert!(table.is_empty());
/// ```
pub struct HashTable<V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    slots: Vec<Slot<V>>,
    len: usize,
    /// Index of the most recently inserted entry, or `END` when empty.
    head: usize,
    _policies: PhantomData<(C, R, P)>,
}

impl<V, C, R, P> HashTable<V, C, R, P> {
    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the bucket array.
    pub fn bucket_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current load factor, `len / bucket_count`.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.slots.len() as f32
    }

    /// Removes all entries, resetting every slot (tombstones included) to
    /// empty. The bucket array is kept at its current size.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.head = END;
        self.len = 0;
    }

    /// Returns an iterator over the values, most recently inserted first.
    ///
    /// The traversal follows the embedded list, so the relative order of
    /// surviving entries is stable across removals of other entries.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.slots,
            pos: self.head,
            remaining: self.len,
        }
    }

    /// Returns an iterator that removes and yields every value, most recently
    /// inserted first. Dropping the iterator removes any values not yet
    /// yielded and resets the table.
    pub fn drain(&mut self) -> Drain<'_, V, C, R, P> {
        Drain { table: self }
    }

    /// Returns the position of the most recently inserted entry.
    pub fn head_pos(&self) -> Option<Pos> {
        (self.head != END).then_some(Pos(self.head))
    }

    /// Returns the position following `pos` in traversal order (the entry
    /// inserted immediately before it that is still present).
    pub fn next_pos(&self, pos: Pos) -> Option<Pos> {
        let next = self.slots.get(pos.0)?.node()?.next;
        (next != END).then_some(Pos(next))
    }

    /// Returns a reference to the value at `pos`, if the slot is occupied.
    pub fn get_pos(&self, pos: Pos) -> Option<&V> {
        self.slots.get(pos.0)?.node().map(|node| &node.value)
    }

    /// Returns a mutable reference to the value at `pos`, if the slot is
    /// occupied.
    pub fn get_pos_mut(&mut self, pos: Pos) -> Option<&mut V> {
        self.slots
            .get_mut(pos.0)?
            .node_mut()
            .map(|node| &mut node.value)
    }

    /// Removes and returns the value at `pos`, if the slot is occupied.
    pub fn remove_pos(&mut self, pos: Pos) -> Option<V> {
        if pos.0 >= self.slots.len() {
            return None;
        }
        self.remove_at(pos.0)
    }

    /// Removes every entry from `first` (inclusive) to `last` (exclusive) in
    /// traversal order, where `None` means "through the end of the list".
    /// Returns the number of entries removed.
    ///
    /// The surrounding list is spliced once, linking `first`'s predecessor
    /// directly past the range, and each slot in between is tombstoned, so
    /// the whole operation is linear in the length of the range.
    ///
    /// If `last` is not reachable from `first` by following the traversal
    /// order, the walk removes through the end of the list.
    pub fn remove_range(&mut self, first: Pos, last: Option<Pos>) -> usize {
        let stop = last.map_or(END, |pos| pos.0);
        let Some(first_prev) = self
            .slots
            .get(first.0)
            .and_then(Slot::node)
            .map(|node| node.prev)
        else {
            return 0;
        };

        let mut cur = first.0;
        let mut removed = 0;
        while cur != stop && cur != END {
            let Some(node) = self.slots[cur].take() else {
                break;
            };
            cur = node.next;
            self.len -= 1;
            removed += 1;
        }
        // The walk ended either at `stop` or at the list terminator; splice
        // the predecessor to whichever it was.
        self.link_nodes(first_prev, cur);
        removed
    }

    /// Splices `left` and `right` together in the list, where either side may
    /// be the `END` terminator.
    fn link_nodes(&mut self, left: usize, right: usize) {
        if left == END {
            self.head = right;
        } else if let Some(node) = self.slots[left].node_mut() {
            node.next = right;
        }
        if right != END {
            if let Some(node) = self.slots[right].node_mut() {
                node.prev = left;
            }
        }
    }

    /// Unlinks the slot at `pos`, tombstones it, and returns the value.
    fn remove_at(&mut self, pos: usize) -> Option<V> {
        let (prev, next) = {
            let node = self.slots[pos].node()?;
            (node.prev, node.next)
        };
        self.link_nodes(prev, next);
        let node = self.slots[pos].take()?;
        self.len -= 1;
        Some(node.value)
    }

    fn pop_head(&mut self) -> Option<V> {
        if self.head == END {
            return None;
        }
        self.remove_at(self.head)
    }

    fn fresh_slots(buckets: usize) -> Vec<Slot<V>> {
        let mut slots = Vec::with_capacity(buckets);
        slots.resize_with(buckets, || Slot::Empty);
        slots
    }
}

impl<V, C, R, P> HashTable<V, C, R, P>
where
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    /// Creates an empty table sized at the rehash policy's baseline.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a table that can hold at least `capacity` entries without
    /// rehashing.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let buckets = P::grow(P::buckets_for(capacity), 0);
        Self {
            slots: Self::fresh_slots(buckets),
            len: 0,
            head: END,
            _policies: PhantomData,
        }
    }

    /// Returns the number of entries the table can hold before the rehash
    /// policy forces growth.
    pub fn capacity(&self) -> usize {
        (self.slots.len() as f32 * P::max_load_factor()) as usize
    }

    /// Returns the maximum load factor enforced by the rehash policy.
    pub fn max_load_factor(&self) -> f32 {
        P::max_load_factor()
    }

    /// Returns a reference to the value matching `hash` and `eq`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.entry(hash_u64(1), |&v| v == 1).or_insert(1);
    ///
    /// assert_eq!(table.find(hash_u64(1), |&v| v == 1), Some(&1));
    /// assert_eq!(table.find(hash_u64(2), |&v| v == 2), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let pos = self.locate(hash, &eq, false);
        self.slots[pos].node().map(|node| &node.value)
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let pos = self.locate(hash, &eq, false);
        self.slots[pos].node_mut().map(|node| &mut node.value)
    }

    /// Removes and returns the value matching `hash` and `eq`. Removing an
    /// absent value is a no-op returning `None`.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let pos = self.locate(hash, &eq, false);
        if !self.slots[pos].is_occupied() {
            return None;
        }
        self.remove_at(pos)
    }

    /// Returns the entry matching `hash` and `eq` for in-place manipulation.
    ///
    /// The table grows first if admitting one more entry would violate the
    /// policy's load factor bound, so a vacant entry's `insert` never
    /// rehashes. A single probe walk then finds either the match or the
    /// insertion slot, reusing the first tombstone the walk stepped over.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_hash::hash_table::{Entry, HashTable};
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table: HashTable<String> = HashTable::new();
    /// match table.entry(hash_str("hello"), |s| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!("table was empty"),
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V, C, R, P> {
        if P::needs_rehash(self.len + 1, self.slots.len()) {
            self.grow_rehash(self.len + 1);
        }
        let pos = self.locate(hash, &eq, true);
        if self.slots[pos].is_occupied() {
            Entry::Occupied(OccupiedEntry { table: self, pos })
        } else {
            Entry::Vacant(VacantEntry {
                table: self,
                hash,
                pos,
            })
        }
    }

    /// Like [`entry`](Self::entry), but first checks the hinted position: if
    /// that slot is occupied and matches, it is returned directly with no
    /// probing.
    pub fn entry_hinted(
        &mut self,
        hint: Pos,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> Entry<'_, V, C, R, P> {
        let matches = self
            .slots
            .get(hint.0)
            .and_then(Slot::node)
            .is_some_and(|node| node.hash == hash && eq(&node.value));
        if matches {
            return Entry::Occupied(OccupiedEntry {
                table: self,
                pos: hint.0,
            });
        }
        self.entry(hash, eq)
    }

    /// Rebuilds the table with at least `bucket_count` buckets (rounded up by
    /// the rehash policy; never shrinks below the current size).
    ///
    /// All positions and iterators are invalidated: the backing array is
    /// replaced and every entry is re-bucketed from its cached hash. The
    /// traversal order of the entries is preserved.
    pub fn rehash(&mut self, bucket_count: usize) {
        self.rehash_to(P::grow(bucket_count, self.slots.len()));
    }

    /// Grows the table, if needed, so that `additional` more entries fit
    /// without rehashing.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.reserve(1000);
    /// assert!(table.capacity() >= 1000);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len.saturating_add(additional);
        if P::needs_rehash(required, self.slots.len()) {
            self.grow_rehash(required);
        }
    }

    fn grow_rehash(&mut self, expected: usize) {
        self.rehash_to(P::grow(P::buckets_for(expected), self.slots.len()));
    }

    /// Replaces the bucket array and re-inserts every entry by plain probing.
    /// The new array starts with no tombstones, so the tombstone-seeking walk
    /// is unnecessary on this path.
    fn rehash_to(&mut self, new_buckets: usize) {
        let mut old = core::mem::replace(&mut self.slots, Self::fresh_slots(new_buckets));
        let mut cur = self.head;
        self.head = END;
        self.len = 0;

        let buckets = self.slots.len();
        // Walking the old list head-to-tail and appending keeps the chain in
        // the exact order it had before the rehash.
        let mut tail = END;
        while cur != END {
            let Some(node) = old[cur].take() else {
                break;
            };
            cur = node.next;

            let start = R::bucket(node.hash, buckets);
            let mut pos = start;
            let mut step = 0;
            while self.slots[pos].is_occupied() {
                step += 1;
                pos = C::next(start, step, buckets);
            }

            self.slots[pos] = Slot::Occupied(Node {
                hash: node.hash,
                next: END,
                prev: tail,
                value: node.value,
            });
            if tail == END {
                self.head = pos;
            } else if let Some(prev) = self.slots[tail].node_mut() {
                prev.next = pos;
            }
            tail = pos;
            self.len += 1;
        }
    }

    /// Walks the probe sequence for `hash` and returns either the slot whose
    /// value matches `eq`, or the slot an insertion should use.
    ///
    /// The walk stops at the first empty slot: an empty slot proves the value
    /// is absent, because insertions never skip past empties. Tombstones do
    /// not stop the walk. When `seek_tombstone` is set, the first tombstone
    /// stepped over is remembered and returned in preference to the
    /// terminating empty slot, so insertions reclaim erased slots instead of
    /// lengthening probe chains.
    ///
    /// Terminates because the rehash policy keeps the table strictly below
    /// full, so every probe walk reaches a non-occupied slot.
    fn locate(&self, hash: u64, eq: &impl Fn(&V) -> bool, seek_tombstone: bool) -> usize {
        let buckets = self.slots.len();
        let start = R::bucket(hash, buckets);
        // `buckets` doubles as the "no tombstone seen" marker.
        let mut first_tombstone = buckets;
        let mut pos = start;
        let mut step = 0;
        loop {
            match &self.slots[pos] {
                Slot::Empty => {
                    return if first_tombstone == buckets {
                        pos
                    } else {
                        first_tombstone
                    };
                }
                Slot::Occupied(node) => {
                    if node.hash == hash && eq(&node.value) {
                        return pos;
                    }
                }
                Slot::Tombstone => {
                    if seek_tombstone && first_tombstone == buckets {
                        first_tombstone = pos;
                    }
                }
            }
            step += 1;
            pos = C::next(start, step, buckets);
        }
    }
}

impl<V, C, R, P> Default for HashTable<V, C, R, P>
where
    C: ProbeSequence,
    R: RangeHash,
    P: RehashPolicy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C, R, P> Clone for HashTable<V, C, R, P>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            head: self.head,
            _policies: PhantomData,
        }
    }
}

impl<V, C, R, P> Debug for HashTable<V, C, R, P>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, V, C, R, P> IntoIterator for &'a HashTable<V, C, R, P> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, C, R, P> IntoIterator for HashTable<V, C, R, P> {
    type Item = V;
    type IntoIter = IntoIter<V, C, R, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { table: self }
    }
}

/// A view into a single slot of the table, occupied or vacant.
///
/// Constructed by [`HashTable::entry`].
pub enum Entry<'a, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    /// The probe walk found a matching value.
    Occupied(OccupiedEntry<'a, V, C, R, P>),
    /// No match; holds the slot an insertion will use.
    Vacant(VacantEntry<'a, V, C, R, P>),
}

impl<'a, V, C, R, P> Entry<'a, V, C, R, P> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place access to an occupied entry before any potential
    /// insert.
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
}

/// A view into an occupied slot.
pub struct OccupiedEntry<'a, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    table: &'a mut HashTable<V, C, R, P>,
    pos: usize,
}

impl<'a, V, C, R, P> OccupiedEntry<'a, V, C, R, P> {
    /// Returns the position of this entry, usable as an insertion hint.
    pub fn pos(&self) -> Pos {
        Pos(self.pos)
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        match self.table.slots[self.pos].node() {
            Some(node) => &node.value,
            None => unreachable!(),
        }
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        match self.table.slots[self.pos].node_mut() {
            Some(node) => &mut node.value,
            None => unreachable!(),
        }
    }

    /// Converts the entry into a mutable reference tied to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match self.table.slots[self.pos].node_mut() {
            Some(node) => &mut node.value,
            None => unreachable!(),
        }
    }

    /// Removes the entry and returns the value.
    pub fn remove(self) -> V {
        match self.table.remove_at(self.pos) {
            Some(value) => value,
            None => unreachable!(),
        }
    }
}

/// A view into a vacant slot, holding the precomputed hash for insertion.
pub struct VacantEntry<'a, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    table: &'a mut HashTable<V, C, R, P>,
    hash: u64,
    pos: usize,
}

impl<'a, V, C, R, P> VacantEntry<'a, V, C, R, P> {
    /// Inserts `value` into the slot, splicing it in as the new list head,
    /// and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let old_head = self.table.head;
        self.table.slots[self.pos] = Slot::Occupied(Node {
            hash: self.hash,
            next: old_head,
            prev: END,
            value,
        });
        if old_head != END {
            if let Some(node) = self.table.slots[old_head].node_mut() {
                node.prev = self.pos;
            }
        }
        self.table.head = self.pos;
        self.table.len += 1;

        match self.table.slots[self.pos].node_mut() {
            Some(node) => &mut node.value,
            None => unreachable!(),
        }
    }
}

/// A borrowing iterator over the values of a [`HashTable`], most recently
/// inserted first.
pub struct Iter<'a, V> {
    slots: &'a [Slot<V>],
    pos: usize,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == END {
            return None;
        }
        let node = self.slots[self.pos].node()?;
        self.pos = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    table: &'a mut HashTable<V, C, R, P>,
}

impl<'a, V, C, R, P> Iterator for Drain<'a, V, C, R, P> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.table.pop_head()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len, Some(self.table.len))
    }
}

impl<'a, V, C, R, P> Drop for Drain<'a, V, C, R, P> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.clear();
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V, C = LinearProbing, R = MaskRangeHashing, P = Power2Rehash> {
    table: HashTable<V, C, R, P>,
}

impl<V, C, R, P> Iterator for IntoIter<V, C, R, P> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.table.pop_head()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len, Some(self.table.len))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::policy::QuadraticProbing;

    // Engine tests drive the table with the key itself as the hash so bucket
    // placement is fully deterministic.
    fn insert(table: &mut HashTable<u64>, key: u64) -> bool {
        match table.entry(key, |&v| v == key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(key);
                true
            }
        }
    }

    fn contents(table: &HashTable<u64>) -> Vec<u64> {
        table.iter().copied().collect()
    }

    #[test]
    fn empty_table_baseline() {
        let table: HashTable<u64> = HashTable::new();
        assert_eq!(table.bucket_count(), 64);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.load_factor(), 0.0);
        assert_eq!(table.max_load_factor(), 0.5);
    }

    #[test]
    fn insert_find_remove_round_trip() {
        let mut table: HashTable<u64> = HashTable::new();
        assert!(insert(&mut table, 42));
        assert!(!insert(&mut table, 42));
        assert_eq!(table.len(), 1);

        assert_eq!(table.find(42, |&v| v == 42), Some(&42));
        assert_eq!(table.remove(42, |&v| v == 42), Some(42));
        assert_eq!(table.find(42, |&v| v == 42), None);
        assert_eq!(table.remove(42, |&v| v == 42), None);
        assert!(table.is_empty());
    }

    #[test]
    fn single_rehash_while_filling_to_initial_bucket_count() {
        // Start at 64 buckets; the 33rd insert crosses the 0.5 bound and
        // doubles the table exactly once on the way to 64 entries.
        let mut table: HashTable<u64> = HashTable::new();
        let initial = table.bucket_count();
        let mut rehashes = 0;
        let mut buckets = initial;
        for key in 1..=initial as u64 {
            insert(&mut table, key);
            if table.bucket_count() != buckets {
                rehashes += 1;
                buckets = table.bucket_count();
            }
        }
        assert_eq!(rehashes, 1);
        assert_eq!(table.bucket_count(), 2 * initial);
        assert_eq!(table.len(), initial);
        for key in 1..=initial as u64 {
            assert_eq!(table.find(key, |&v| v == key), Some(&key));
        }
    }

    #[test]
    fn load_factor_bound_holds_after_every_mutation() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..1000 {
            insert(&mut table, key);
            assert!(table.load_factor() <= table.max_load_factor());
        }
        for key in (0..1000).step_by(3) {
            table.remove(key, |&v| v == key);
            assert!(table.load_factor() <= table.max_load_factor());
        }
    }

    #[test]
    fn traversal_is_newest_first_and_stable_across_removals() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in [1, 2, 3] {
            insert(&mut table, key);
        }
        assert_eq!(contents(&table), [3, 2, 1]);

        // Removing a middle entry must not disturb the relative order of the
        // survivors, and a later insert lands at the head.
        table.remove(2, |&v| v == 2);
        insert(&mut table, 4);
        assert_eq!(contents(&table), [4, 3, 1]);
    }

    #[test]
    fn tombstone_keeps_probe_chains_reachable() {
        // Keys 0, 64, 128 all mask to bucket 0 in a 64-bucket table and form
        // one linear probe chain. Erasing the middle link must leave the tail
        // reachable, and the next colliding insert must reuse the tombstone
        // rather than extend the chain.
        let mut table: HashTable<u64> = HashTable::new();
        assert_eq!(table.bucket_count(), 64);
        for key in [0, 64, 128] {
            insert(&mut table, key);
        }
        table.remove(64, |&v| v == 64);
        assert_eq!(table.find(128, |&v| v == 128), Some(&128));

        insert(&mut table, 192);
        assert_eq!(table.find(192, |&v| v == 192), Some(&192));
        assert_eq!(table.find(128, |&v| v == 128), Some(&128));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn tombstone_reuse_does_not_perturb_list_order() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in [0, 64, 128, 7, 9] {
            insert(&mut table, key);
        }
        table.remove(64, |&v| v == 64);
        let before = contents(&table);

        // 192 reuses 64's slot, but as the newest entry it must appear at
        // the head, with everything else unchanged.
        insert(&mut table, 192);
        let after = contents(&table);
        assert_eq!(after[0], 192);
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn reserve_prevents_mid_sequence_rehash() {
        let mut table: HashTable<u64> = HashTable::new();
        table.reserve(1000);
        let buckets = table.bucket_count();
        for key in 0..1000 {
            insert(&mut table, key);
        }
        assert_eq!(table.bucket_count(), buckets);
        assert_eq!(table.len(), 1000);
        for key in 0..1000 {
            assert_eq!(table.find(key, |&v| v == key), Some(&key));
        }
    }

    #[test]
    fn rehash_preserves_traversal_order() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..30 {
            insert(&mut table, key);
        }
        table.remove(11, |&v| v == 11);
        table.remove(27, |&v| v == 27);
        let before = contents(&table);

        table.rehash(4096);
        assert_eq!(table.bucket_count(), 4096);
        assert_eq!(contents(&table), before);
        for &key in &before {
            assert_eq!(table.find(key, |&v| v == key), Some(&key));
        }
    }

    #[test]
    fn rehash_never_shrinks() {
        let mut table: HashTable<u64> = HashTable::new();
        table.reserve(1000);
        let buckets = table.bucket_count();
        table.rehash(64);
        assert_eq!(table.bucket_count(), buckets);
    }

    #[test]
    fn clear_resets_tombstones() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..20 {
            insert(&mut table, key);
        }
        for key in 0..20 {
            table.remove(key, |&v| v == key);
        }
        table.clear();
        assert!(table.is_empty());

        insert(&mut table, 0);
        assert_eq!(table.find(0, |&v| v == 0), Some(&0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn entry_hinted_short_circuits_on_match() {
        let mut table: HashTable<u64> = HashTable::new();
        insert(&mut table, 5);
        let pos = match table.entry(5, |&v| v == 5) {
            Entry::Occupied(entry) => entry.pos(),
            Entry::Vacant(_) => unreachable!(),
        };

        match table.entry_hinted(pos, 5, |&v| v == 5) {
            Entry::Occupied(entry) => assert_eq!(entry.pos(), pos),
            Entry::Vacant(_) => unreachable!(),
        }

        // A stale or mismatched hint falls back to a normal probe.
        match table.entry_hinted(pos, 6, |&v| v == 6) {
            Entry::Occupied(_) => unreachable!(),
            Entry::Vacant(entry) => {
                entry.insert(6);
            }
        }
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn position_traversal_matches_iter() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in [10, 20, 30] {
            insert(&mut table, key);
        }

        let mut via_pos = Vec::new();
        let mut cursor = table.head_pos();
        while let Some(pos) = cursor {
            via_pos.push(*table.get_pos(pos).unwrap());
            cursor = table.next_pos(pos);
        }
        assert_eq!(via_pos, contents(&table));
    }

    #[test]
    fn remove_pos_unlinks_single_entry() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in [1, 2, 3] {
            insert(&mut table, key);
        }
        let head = table.head_pos().unwrap();
        let second = table.next_pos(head).unwrap();
        assert_eq!(table.remove_pos(second), Some(2));
        assert_eq!(contents(&table), [3, 1]);
        assert_eq!(table.remove_pos(second), None);
    }

    #[test]
    fn remove_range_splices_once() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 1..=6 {
            insert(&mut table, key);
        }
        // Traversal: 6 5 4 3 2 1. Remove [5, 2) leaving 6 2 1.
        let head = table.head_pos().unwrap();
        let first = table.next_pos(head).unwrap();
        let mut last = first;
        for _ in 0..3 {
            last = table.next_pos(last).unwrap();
        }

        assert_eq!(table.remove_range(first, Some(last)), 3);
        assert_eq!(contents(&table), [6, 2, 1]);
        assert_eq!(table.len(), 3);
        for key in [5, 4, 3] {
            assert_eq!(table.find(key, |&v| v == key), None);
        }
    }

    #[test]
    fn remove_range_to_end() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 1..=4 {
            insert(&mut table, key);
        }
        let head = table.head_pos().unwrap();
        let second = table.next_pos(head).unwrap();
        assert_eq!(table.remove_range(second, None), 3);
        assert_eq!(contents(&table), [4]);
    }

    #[test]
    fn remove_range_with_unreachable_last_removes_to_end() {
        // `last` precedes `first` in traversal order, so the walk never
        // reaches it and must run through the end of the list instead.
        let mut table: HashTable<u64> = HashTable::new();
        for key in 1..=4 {
            insert(&mut table, key);
        }
        let head = table.head_pos().unwrap();
        let first = table.next_pos(head).unwrap();

        assert_eq!(table.remove_range(first, Some(head)), 3);
        assert_eq!(table.len(), 1);
        assert_eq!(contents(&table), [4]);
        assert_eq!(table.next_pos(head), None);
    }

    #[test]
    fn drain_yields_everything_and_resets() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..40 {
            insert(&mut table, key);
        }
        table.remove(13, |&v| v == 13);

        let drained: Vec<u64> = table.drain().collect();
        assert_eq!(drained.len(), 39);
        assert!(table.is_empty());

        // Dropping a partially consumed drain finishes the job.
        for key in 0..10 {
            insert(&mut table, key);
        }
        {
            let mut drain = table.drain();
            assert!(drain.next().is_some());
        }
        assert!(table.is_empty());
        assert!(insert(&mut table, 99));
    }

    #[test]
    fn into_iter_consumes_in_traversal_order() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in [1, 2, 3] {
            insert(&mut table, key);
        }
        let values: Vec<u64> = table.into_iter().collect();
        assert_eq!(values, [3, 2, 1]);
    }

    #[test]
    fn clone_is_independent() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..10 {
            insert(&mut table, key);
        }
        let snapshot = table.clone();
        table.remove(3, |&v| v == 3);

        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot.find(3, |&v| v == 3), Some(&3));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn quadratic_probing_table_survives_collisions() {
        let mut table: HashTable<u64, QuadraticProbing> = HashTable::new();
        // All of these collide in bucket 0 of a 64-bucket table.
        let keys: Vec<u64> = (0..20).map(|i| i * 64).collect();
        for &key in &keys {
            match table.entry(key, |&v| v == key) {
                Entry::Occupied(_) => panic!("duplicate insert for {key}"),
                Entry::Vacant(entry) => {
                    entry.insert(key);
                }
            }
        }
        for &key in &keys {
            assert_eq!(table.find(key, |&v| v == key), Some(&key));
        }
        for &key in &keys {
            assert_eq!(table.remove(key, |&v| v == key), Some(key));
        }
        assert!(table.is_empty());
    }
}
