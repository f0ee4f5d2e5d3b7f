use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not present in the table.
    #[error("key not found in hash table")]
    KeyNotFound,
}

/// Result type for hash table operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The result of [`HashTable::add`](crate::HashTable::add).
///
/// Adding a key that is already present leaves the table untouched; this is
/// reported as [`InsertOutcome::DuplicateIgnored`] rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The pair was stored.
    Inserted,
    /// The key was already present, the table is unchanged.
    DuplicateIgnored,
}

impl InsertOutcome {
    /// Returns `true` if the pair was stored.
    pub fn is_inserted(self) -> bool {
        self == InsertOutcome::Inserted
    }

    /// Returns `true` if the key was already present.
    pub fn is_duplicate(self) -> bool {
        self == InsertOutcome::DuplicateIgnored
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found in hash table");
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(InsertOutcome::Inserted.is_inserted());
        assert!(!InsertOutcome::Inserted.is_duplicate());
        assert!(InsertOutcome::DuplicateIgnored.is_duplicate());
        assert!(!InsertOutcome::DuplicateIgnored.is_inserted());
    }
}
