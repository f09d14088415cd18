use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::LedgerError;
use crate::iterator::{KV, SnapshotCursor, StateIterator};
use crate::traits::{Ledger, range_bounds, validate_key};

/// Ledger operations that can be made to fail on a [`MemoryLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LedgerOp {
    Get,
    Put,
    Delete,
    Scan,
    /// The first entry pulled from a range iterator.
    Next,
}

/// MemoryLedger is an in-process world state.
///
/// It stands in for the hosting platform in tests: besides the `BTreeMap`
/// state it tracks how many range iterators are still open and can be told to
/// fail individual operations with [`LedgerError::Storage`].
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    faults: RwLock<BTreeSet<LedgerOp>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `op` fail until [`MemoryLedger::heal`] is called.
    pub fn fail(&self, op: LedgerOp) {
        if let Ok(mut faults) = self.faults.write() {
            faults.insert(op);
        }
    }

    pub fn heal(&self, op: LedgerOp) {
        if let Ok(mut faults) = self.faults.write() {
            faults.remove(&op);
        }
    }

    /// Number of range iterators handed out and not yet released.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Number of keys currently in the world state.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, op: LedgerOp) -> Result<(), LedgerError> {
        let faults = self.faults.read().map_err(poisoned)?;
        if faults.contains(&op) {
            return Err(LedgerError::Storage(format!("injected {:?} failure", op)));
        }
        Ok(())
    }

    fn faulted(&self, op: LedgerOp) -> bool {
        self.check(op).is_err()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Storage("world state lock poisoned".into())
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.check(LedgerOp::Get)?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        validate_key(key)?;
        self.check(LedgerOp::Put)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert(key.to_string(), value.to_vec());
        debug!(key, len = value.len(), "memory ledger put");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.check(LedgerOp::Delete)?;
        let mut state = self.state.write().map_err(poisoned)?;
        state.remove(key);
        debug!(key, "memory ledger delete");
        Ok(())
    }

    fn scan_range(&self, start_key: &str, end_key: &str) -> Result<StateIterator, LedgerError> {
        self.check(LedgerOp::Scan)?;
        let entries = match range_bounds(start_key, end_key) {
            Some(bounds) => {
                let state = self.state.read().map_err(poisoned)?;
                state
                    .range::<str, _>(bounds)
                    .map(|(key, value)| KV {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        let open = self.open_iterators.clone();
        let mut cursor = SnapshotCursor::new(entries).on_close(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        });
        if self.faulted(LedgerOp::Next) {
            cursor = cursor.fail_at(0);
        }
        Ok(StateIterator::new(cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(iter: StateIterator) -> Vec<String> {
        iter.map(|e| e.unwrap().key).collect()
    }

    #[test]
    fn get_put_delete() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.get("k").unwrap(), None);

        ledger.put("k", b"v1").unwrap();
        assert_eq!(ledger.get("k").unwrap(), Some(b"v1".to_vec()));

        ledger.put("k", b"v2").unwrap();
        assert_eq!(ledger.get("k").unwrap(), Some(b"v2".to_vec()));

        ledger.delete("k").unwrap();
        assert_eq!(ledger.get("k").unwrap(), None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn delete_absent_key_is_ok() {
        let ledger = MemoryLedger::new();
        assert!(ledger.delete("missing").is_ok());
    }

    #[test]
    fn put_rejects_empty_key() {
        let ledger = MemoryLedger::new();
        assert!(matches!(ledger.put("", b"v"), Err(LedgerError::InvalidKey(_))));
    }

    #[test]
    fn scan_full_range_sorted() {
        let ledger = MemoryLedger::new();
        for key in ["c", "a", "b"] {
            ledger.put(key, b"x").unwrap();
        }
        assert_eq!(keys(ledger.scan_range("", "").unwrap()), vec!["a", "b", "c"]);
    }

    #[test]
    fn scan_half_open_range() {
        let ledger = MemoryLedger::new();
        for key in ["DEV1", "DEV2", "DEV3", "FW1"] {
            ledger.put(key, b"x").unwrap();
        }
        assert_eq!(
            keys(ledger.scan_range("DEV2", "FW1").unwrap()),
            vec!["DEV2", "DEV3"]
        );
        assert_eq!(keys(ledger.scan_range("DEV3", "").unwrap()), vec!["DEV3", "FW1"]);
        assert!(keys(ledger.scan_range("FW1", "DEV1").unwrap()).is_empty());
    }

    #[test]
    fn iterators_are_tracked_until_released() {
        let ledger = MemoryLedger::new();
        ledger.put("a", b"x").unwrap();

        let first = ledger.scan_range("", "").unwrap();
        let second = ledger.scan_range("", "").unwrap();
        assert_eq!(ledger.open_iterators(), 2);

        first.close();
        assert_eq!(ledger.open_iterators(), 1);
        drop(second);
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn scan_is_a_snapshot() {
        let ledger = MemoryLedger::new();
        ledger.put("a", b"x").unwrap();
        let iter = ledger.scan_range("", "").unwrap();
        ledger.put("b", b"y").unwrap();
        assert_eq!(keys(iter), vec!["a"]);
    }

    #[test]
    fn injected_faults() {
        let ledger = MemoryLedger::new();
        ledger.put("a", b"x").unwrap();

        ledger.fail(LedgerOp::Get);
        assert!(matches!(ledger.get("a"), Err(LedgerError::Storage(_))));
        ledger.heal(LedgerOp::Get);
        assert!(ledger.get("a").is_ok());

        ledger.fail(LedgerOp::Put);
        assert!(ledger.put("b", b"y").is_err());
        ledger.fail(LedgerOp::Delete);
        assert!(ledger.delete("a").is_err());
        ledger.fail(LedgerOp::Scan);
        assert!(ledger.scan_range("", "").is_err());
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn injected_next_fault() {
        let ledger = MemoryLedger::new();
        ledger.put("a", b"x").unwrap();
        ledger.fail(LedgerOp::Next);

        let mut iter = ledger.scan_range("", "").unwrap();
        assert!(matches!(iter.next(), Some(Err(LedgerError::Storage(_)))));
        drop(iter);
        assert_eq!(ledger.open_iterators(), 0);
    }
}
