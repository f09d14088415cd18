use std::ops::Bound;

use crate::error::LedgerError;
use crate::iterator::StateIterator;

/// Ledger is the world-state interface a contract runs against.
///
/// The hosting platform owns ordering and durability; implementations only
/// need each call to be atomic for the key it touches.
pub trait Ledger: Send + Sync {
    /// Get the value stored at `key`. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), LedgerError>;

    /// Open an iterator over `[start_key, end_key)` in ascending key order.
    /// An empty bound is unbounded on that side, so `("", "")` scans everything.
    ///
    /// The returned iterator holds a cursor until it is closed or dropped.
    fn scan_range(&self, start_key: &str, end_key: &str) -> Result<StateIterator, LedgerError>;
}

/// Reject keys the world state cannot address.
pub(crate) fn validate_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::InvalidKey("key must not be empty".into()));
    }
    Ok(())
}

/// Translate scan bounds into a key range. Returns None when the range is empty.
pub(crate) fn range_bounds<'a>(
    start_key: &'a str,
    end_key: &'a str,
) -> Option<(Bound<&'a str>, Bound<&'a str>)> {
    if !start_key.is_empty() && !end_key.is_empty() && start_key >= end_key {
        return None;
    }
    let start = if start_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start_key)
    };
    let end = if end_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end_key)
    };
    Some((start, end))
}
