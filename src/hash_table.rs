use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::entry::Entry;
use crate::error::Error;
use crate::error::InsertOutcome;
use crate::error::Result;

/// Number of buckets in a table created with [`HashTable::new`].
pub const INITIAL_CAPACITY: usize = 16;

/// Largest population a table with `buckets` buckets may hold while keeping
/// the load factor at or below 0.80.
#[inline(always)]
fn target_load_factor(buckets: usize) -> usize {
    ((buckets as u128 * 4) / 5) as usize
}

#[inline(always)]
fn target_load_factor_inverse(capacity: usize) -> usize {
    usize::try_from((capacity as u128 * 5).div_ceil(4)).expect("capacity overflow")
}

/// Bucket count for a table that must hold `capacity` entries without
/// growing. Always a power of two, never below [`INITIAL_CAPACITY`].
fn bucket_count(capacity: usize) -> usize {
    target_load_factor_inverse(capacity)
        .checked_next_power_of_two()
        .expect("capacity overflow")
        .max(INITIAL_CAPACITY)
}

/// A chain member. The key's hash is cached so growth never rehashes keys
/// and scans can reject mismatches without comparing keys.
#[derive(Clone)]
struct Node<K, V> {
    hash: u64,
    entry: Entry<K, V>,
}

type Chain<K, V> = Vec<Node<K, V>>;

fn empty_buckets<K, V>(count: usize) -> Vec<Chain<K, V>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, Vec::new);
    buckets
}

/// Debug statistics for chain-length analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub len: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Buckets holding more than one entry
    pub colliding_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (len / capacity)
    pub load_factor: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Buckets: {} occupied, {} colliding ({:.2}% of occupied)",
            self.occupied_buckets,
            self.colliding_buckets,
            if self.occupied_buckets == 0 {
                0.0
            } else {
                (self.colliding_buckets as f64 / self.occupied_buckets as f64) * 100.0
            }
        );
        println!("Longest chain: {}", self.longest_chain);
    }
}

/// A hash table using separate chaining.
///
/// `HashTable<K, V, S>` maps keys of type `K` to values of type `V`, hashing
/// keys with the [`BuildHasher`] `S`. Every bucket owns an ordered chain of
/// [`Entry`] values; entries keep their insertion order within a chain.
///
/// The bucket count starts at [`INITIAL_CAPACITY`], is always a power of two,
/// and doubles before an insertion would push the load factor above 0.80.
/// The table never shrinks on removal.
///
/// ## Example
///
/// ```rust
/// # use core::hash::BuildHasherDefault;
/// #
/// # use chain_hash::HashTable;
/// # use chain_hash::InsertOutcome;
/// # use siphasher::sip::SipHasher;
/// #
/// let mut table: HashTable<&str, i32, BuildHasherDefault<SipHasher>> = HashTable::new();
///
/// assert_eq!(table.add("a", 1), InsertOutcome::Inserted);
/// assert_eq!(table.add("a", 2), InsertOutcome::DuplicateIgnored);
/// assert_eq!(table.get(&"a"), Ok(&1));
///
/// assert_eq!(table.add_or_replace("a", 2), Some(1));
/// assert_eq!(table.get(&"a"), Ok(&2));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, S> {
    buckets: Vec<Chain<K, V>>,
    populated: usize,
    initial_buckets: usize,
    hash_builder: S,
}

impl<K, V, S> Debug for HashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.key(), entry.value())))
            .finish()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    #[inline(always)]
    fn slot(&self, hash: u64) -> usize {
        // Equivalent to `hash % capacity` since capacity is a power of two.
        hash as usize & (self.buckets.len() - 1)
    }

    /// Appends `node` to the chain at `slot`. The key must not already be in
    /// that chain.
    #[inline]
    fn push_node(&mut self, slot: usize, node: Node<K, V>) {
        self.buckets[slot].push(node);
        self.populated += 1;
    }

    /// Doubles the bucket count and relinks every entry.
    ///
    /// Chains are walked in bucket order, then chain order, so entries that
    /// land in the same new bucket keep their relative order.
    fn grow(&mut self) {
        let new_count = self
            .buckets
            .len()
            .checked_mul(2)
            .expect("capacity overflow");
        log::debug!(
            "growing hash table from {} to {} buckets ({} entries)",
            self.buckets.len(),
            new_count,
            self.populated
        );

        let old_buckets = core::mem::replace(&mut self.buckets, empty_buckets(new_count));
        let expected = self.populated;
        self.populated = 0;

        for node in old_buckets.into_iter().flatten() {
            let slot = self.slot(node.hash);
            self.push_node(slot, node);
        }

        debug_assert_eq!(self.populated, expected);
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets.
    ///
    /// This is always a power of two and at least the bucket count the table
    /// was constructed with. The table holds at most `capacity() * 4 / 5`
    /// entries before it grows.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes all entries and returns the table to the bucket count it was
    /// constructed with.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let mut table: HashTable<u32, u32, BuildHasherDefault<SipHasher>> = HashTable::new();
    /// for i in 0..100 {
    ///     table.add(i, i);
    /// }
    /// assert!(table.capacity() > 16);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn clear(&mut self) {
        log::trace!(
            "clearing hash table ({} entries, {} buckets)",
            self.populated,
            self.buckets.len()
        );
        self.buckets = empty_buckets(self.initial_buckets);
        self.populated = 0;
    }

    /// Returns the number of buckets whose chain holds more than one entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let mut table: HashTable<u32, u32, BuildHasherDefault<SipHasher>> = HashTable::new();
    /// assert_eq!(table.collisions(), 0);
    /// table.add(1, 1);
    /// assert_eq!(table.collisions(), 0);
    /// ```
    pub fn collisions(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.len() > 1).count()
    }

    /// Returns an iterator over all entries in the table.
    ///
    /// Entries are yielded in bucket order, then in insertion order within
    /// each bucket. Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over the keys of the table, in the same order as
    /// [`iter`](HashTable::iter).
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the table, in the same order as
    /// [`iter`](HashTable::iter).
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all entries.
    ///
    /// The table is empty as soon as this returns and keeps its current bucket
    /// count. Entries not consumed are dropped with the iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        let count = self.buckets.len();
        let buckets = core::mem::replace(&mut self.buckets, empty_buckets(count));
        let remaining = core::mem::take(&mut self.populated);
        Drain {
            inner: IntoIter {
                buckets: buckets.into_iter(),
                chain: Vec::new().into_iter(),
                remaining,
            },
            _marker: PhantomData,
        }
    }

    /// Returns the number of buckets per chain length.
    ///
    /// Index `i` of the result counts buckets whose chain holds exactly `i`
    /// entries. The result has one slot past the longest chain.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for chain in &self.buckets {
            hist[chain.len()] += 1;
        }
        hist
    }

    /// Returns chain and load statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            len: self.populated,
            capacity: self.buckets.len(),
            occupied_buckets: self.buckets.iter().filter(|chain| !chain.is_empty()).count(),
            colliding_buckets: self.collisions(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.populated as f64 / self.buckets.len() as f64,
        }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with [`INITIAL_CAPACITY`] buckets and the given
    /// hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty table able to hold `capacity` entries without growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let table: HashTable<u32, u32, _> =
    ///     HashTable::with_capacity_and_hasher(100, BuildHasherDefault::<SipHasher>::default());
    /// assert_eq!(table.capacity(), 128);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let initial_buckets = bucket_count(capacity);
        Self {
            buckets: empty_buckets(initial_buckets),
            populated: 0,
            initial_buckets,
            hash_builder,
        }
    }

    /// Returns the slot for `hash` and the position of `key` in that slot's
    /// chain, if present.
    fn locate(&self, hash: u64, key: &K) -> (usize, Option<usize>) {
        let slot = self.slot(hash);
        let index = self.buckets[slot]
            .iter()
            .position(|node| node.hash == hash && node.entry.key() == key);
        (slot, index)
    }

    /// Links a key known to be absent, growing first if the new entry would
    /// push the load factor above 0.80.
    fn insert_absent(&mut self, hash: u64, key: K, value: V) {
        if self.populated + 1 > target_load_factor(self.buckets.len()) {
            self.grow();
        }

        let slot = self.slot(hash);
        self.push_node(
            slot,
            Node {
                hash,
                entry: Entry::new(key, value),
            },
        );
    }

    /// Adds a key-value pair if the key is not already present.
    ///
    /// Adding an existing key leaves the table unchanged, including its
    /// stored value, and returns [`InsertOutcome::DuplicateIgnored`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::HashTable;
    /// # use chain_hash::InsertOutcome;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let mut table: HashTable<u32, &str, BuildHasherDefault<SipHasher>> = HashTable::new();
    /// assert!(table.add(37, "a").is_inserted());
    /// assert!(table.add(37, "b").is_duplicate());
    /// assert_eq!(table.get(&37), Ok(&"a"));
    /// ```
    pub fn add(&mut self, key: K, value: V) -> InsertOutcome {
        let hash = self.hash_builder.hash_one(&key);
        if let (slot, Some(_)) = self.locate(hash, &key) {
            log::trace!("ignoring insert of duplicate key in bucket {slot}");
            return InsertOutcome::DuplicateIgnored;
        }

        self.insert_absent(hash, key, value);
        InsertOutcome::Inserted
    }

    /// Inserts a key-value pair, replacing any entry with the same key.
    ///
    /// The previous entry is removed and the new one is appended to the end of
    /// its chain. Returns the replaced value, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let mut table: HashTable<u32, &str, BuildHasherDefault<SipHasher>> = HashTable::new();
    /// assert_eq!(table.add_or_replace(37, "a"), None);
    /// assert_eq!(table.add_or_replace(37, "b"), Some("a"));
    /// assert_eq!(table.get(&37), Ok(&"b"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn add_or_replace(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        let previous = match self.locate(hash, &key) {
            (slot, Some(index)) => {
                let node = self.buckets[slot].remove(index);
                self.populated -= 1;
                Some(node.entry.into_parts().1)
            }
            (_, None) => None,
        };

        self.insert_absent(hash, key, value);
        previous
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent; use
    /// [`find`](HashTable::find) or [`contains_key`](HashTable::contains_key)
    /// to test for presence without an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// # use chain_hash::Error;
    /// # use chain_hash::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// let mut table: HashTable<u32, &str, BuildHasherDefault<SipHasher>> = HashTable::new();
    /// table.add(1, "a");
    /// assert_eq!(table.get(&1), Ok(&"a"));
    /// assert_eq!(table.get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn get(&self, key: &K) -> Result<&V> {
        self.find(key).map(Entry::value).ok_or(Error::KeyNotFound)
    }

    /// Returns the entry stored for `key`, or `None` if the key is absent.
    pub fn find(&self, key: &K) -> Option<&Entry<K, V>> {
        let hash = self.hash_builder.hash_one(key);
        let (slot, index) = self.locate(hash, key);
        index.map(|index| &self.buckets[slot][index].entry)
    }

    /// Returns `true` if the table contains an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry for `key`. Returns `true` if an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes and returns the entry for `key`, if present.
    ///
    /// The remaining entries of the chain keep their relative order.
    pub fn remove_entry(&mut self, key: &K) -> Option<Entry<K, V>> {
        let hash = self.hash_builder.hash_one(key);
        let (slot, index) = self.locate(hash, key);
        let node = self.buckets[slot].remove(index?);
        self.populated -= 1;
        Some(node.entry)
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty table with [`INITIAL_CAPACITY`] buckets using the
    /// default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty table able to hold `capacity` entries without growing,
    /// using the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashTable<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|entry| {
            other
                .find(entry.key())
                .is_some_and(|found| found.value() == entry.value())
        })
    }
}

impl<K, V, S> Eq for HashTable<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Adds every pair with [`add`](HashTable::add); keys already present keep
    /// their current value.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for HashTable<K, V, S> {
    type Item = Entry<K, V>;
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            chain: Vec::new().into_iter(),
            remaining: self.populated,
        }
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. Cloning it
/// restarts the traversal from the clone's current position.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Chain<K, V>>,
    chain: core::slice::Iter<'a, Node<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            chain: self.chain.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.next() {
                self.remaining -= 1;
                return Some(&node.entry);
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`HashTable`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashTable`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a [`HashTable`].
pub struct IntoIter<K, V> {
    buckets: alloc::vec::IntoIter<Chain<K, V>>,
    chain: alloc::vec::IntoIter<Node<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.next() {
                self.remaining -= 1;
                return Some(node.entry);
            }
            self.chain = self.buckets.next()?.into_iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    inner: IntoIter<K, V>,
    _marker: PhantomData<&'a mut Chain<K, V>>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}
