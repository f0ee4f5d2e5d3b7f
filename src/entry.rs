use core::fmt::Display;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

/// An immutable key-value pair, the element stored in every bucket chain of a
/// [`HashTable`].
///
/// Equality is structural over both fields. Once constructed an entry is
/// never mutated; replacing a value in the table swaps in a new entry.
///
/// [`HashTable`]: crate::HashTable
///
/// # Examples
///
/// ```rust
/// # use chain_hash::Entry;
/// #
/// let entry = Entry::new("answer", 42);
/// assert_eq!(entry.key(), &"answer");
/// assert_eq!(entry.value(), &42);
/// assert_eq!(entry.to_string(), "answer -> 42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates a new entry from a key and a value.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns a reference to the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns a reference to the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> Entry<K, V>
where
    K: Hash,
    V: Hash,
{
    /// Combines the hashes of the key and the value into a single hash.
    ///
    /// Both fields are hashed independently with `hash_builder` and mixed as
    /// `((h1 << 5) + h1) ^ h2`, so the result depends on both fields and on
    /// their order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::Entry;
    /// # use siphasher::sip::SipHasher;
    /// # use core::hash::BuildHasherDefault;
    /// #
    /// let state = BuildHasherDefault::<SipHasher>::default();
    /// let a = Entry::new(1u32, 2u32);
    /// let b = Entry::new(2u32, 1u32);
    /// assert_eq!(a.combined_hash(&state), Entry::new(1u32, 2u32).combined_hash(&state));
    /// assert_ne!(a.combined_hash(&state), b.combined_hash(&state));
    /// ```
    pub fn combined_hash<S: BuildHasher>(&self, hash_builder: &S) -> u64 {
        let h1 = hash_builder.hash_one(&self.key);
        let h2 = hash_builder.hash_one(&self.value);
        (h1 << 5).wrapping_add(h1) ^ h2
    }
}

impl<K: Hash, V: Hash> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K: Display, V: Display> Display for Entry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} -> {}", self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    fn from(entry: Entry<K, V>) -> Self {
        entry.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use core::hash::BuildHasherDefault;

    use siphasher::sip::SipHasher;

    use super::*;

    type SipState = BuildHasherDefault<SipHasher>;

    #[test]
    fn test_accessors() {
        let entry = Entry::new("key".to_string(), 7);
        assert_eq!(entry.key(), "key");
        assert_eq!(entry.value(), &7);

        let (key, value) = entry.into_parts();
        assert_eq!(key, "key");
        assert_eq!(value, 7);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Entry::new(1, "a"), Entry::new(1, "a"));
        assert_ne!(Entry::new(1, "a"), Entry::new(1, "b"));
        assert_ne!(Entry::new(1, "a"), Entry::new(2, "a"));
    }

    #[test]
    fn test_hash_matches_equality() {
        let state = SipState::default();
        let a = Entry::new("key".to_string(), 1u64);
        let b = Entry::new("key".to_string(), 1u64);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
        assert_eq!(a.combined_hash(&state), b.combined_hash(&state));
    }

    #[test]
    fn test_combined_hash_depends_on_both_fields() {
        let state = SipState::default();
        let base = Entry::new(10u64, 20u64).combined_hash(&state);

        assert_ne!(base, Entry::new(11u64, 20u64).combined_hash(&state));
        assert_ne!(base, Entry::new(10u64, 21u64).combined_hash(&state));
        assert_ne!(base, Entry::new(20u64, 10u64).combined_hash(&state));
    }

    #[test]
    fn test_combined_hash_mix() {
        let state = SipState::default();
        let entry = Entry::new(3u8, 4u8);
        let h1 = state.hash_one(3u8);
        let h2 = state.hash_one(4u8);
        assert_eq!(
            entry.combined_hash(&state),
            h1.wrapping_mul(33) ^ h2,
            "((h1 << 5) + h1) is h1 * 33"
        );
    }

    #[test]
    fn test_display() {
        let entry = Entry::new(String::from("a"), 1);
        assert_eq!(entry.to_string(), "a -> 1");
    }

    #[test]
    fn test_tuple_conversions() {
        let entry: Entry<i32, &str> = (5, "five").into();
        assert_eq!(entry.key(), &5);

        let pair: (i32, &str) = entry.into();
        assert_eq!(pair, (5, "five"));
    }
}
