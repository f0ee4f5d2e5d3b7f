#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// The immutable key-value pair stored in each bucket chain.
pub mod entry;

/// Error and insert-outcome types.
pub mod error;

/// A separate-chaining hash table.
///
/// This module provides the `HashTable` along with its iterators and, with
/// the `stats` feature, chain-length diagnostics.
pub mod hash_table;

pub use entry::Entry;
pub use error::Error;
pub use error::InsertOutcome;
pub use error::Result;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// A [`HashTable`] using [`DefaultHashBuilder`].
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type DefaultHashTable<K, V> = HashTable<K, V, DefaultHashBuilder>;
