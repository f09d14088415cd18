use std::path::Path;
use std::sync::Arc;

use ::redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::LedgerError;
use crate::iterator::{KV, SnapshotCursor, StateIterator};
use crate::traits::{Ledger, range_bounds, validate_key};

fn storage<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::Storage(e.to_string())
}

/// RedbLedger is a persistent world state backed by redb, a pure-Rust
/// embedded key-value database.
///
/// Every namespace is its own redb table, so contracts sharing one database
/// file never see each other's keys.
pub struct RedbLedger {
    db: Arc<Database>,
    table: String,
}

impl RedbLedger {
    /// Open or create a redb database at `path` and bind to `namespace`.
    pub fn open(path: &Path, namespace: &str) -> Result<Self, LedgerError> {
        let db = Database::create(path).map_err(storage)?;
        let ledger = Self {
            db: Arc::new(db),
            table: namespace.to_string(),
        };
        ledger.ensure_table()?;
        debug!(path = %path.display(), namespace, "opened redb world state");
        Ok(ledger)
    }

    /// A ledger over another namespace of the same database.
    pub fn namespace(&self, namespace: &str) -> Result<Self, LedgerError> {
        let ledger = Self {
            db: self.db.clone(),
            table: namespace.to_string(),
        };
        ledger.ensure_table()?;
        Ok(ledger)
    }

    pub fn namespace_name(&self) -> &str {
        &self.table
    }

    fn definition(&self) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(&self.table)
    }

    // Read transactions fail on tables that were never created.
    fn ensure_table(&self) -> Result<(), LedgerError> {
        if self.table.is_empty() {
            return Err(LedgerError::InvalidKey("namespace must not be empty".into()));
        }
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(self.definition()).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }
}

impl Ledger for RedbLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(self.definition()).map_err(storage)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage(e)),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        validate_key(key)?;
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(self.definition()).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        debug!(namespace = %self.table, key, len = value.len(), "redb put");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(self.definition()).map_err(storage)?;
            table.remove(key).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        debug!(namespace = %self.table, key, "redb delete");
        Ok(())
    }

    fn scan_range(&self, start_key: &str, end_key: &str) -> Result<StateIterator, LedgerError> {
        let Some(bounds) = range_bounds(start_key, end_key) else {
            return Ok(StateIterator::empty());
        };

        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(self.definition()).map_err(storage)?;

        let mut entries = Vec::new();
        for entry in table.range::<&str>(bounds).map_err(storage)? {
            let (key, value) = entry.map_err(storage)?;
            entries.push(KV {
                key: key.value().to_string(),
                value: value.value().to_vec(),
            });
        }

        Ok(StateIterator::new(SnapshotCursor::new(entries)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open(tmp: &TempDir) -> RedbLedger {
        RedbLedger::open(&tmp.path().join("world_state.redb"), "firmware").unwrap()
    }

    #[test]
    fn get_put_delete() {
        let tmp = TempDir::new().unwrap();
        let ledger = open(&tmp);

        assert_eq!(ledger.get("FW001").unwrap(), None);
        ledger.put("FW001", b"{}").unwrap();
        assert_eq!(ledger.get("FW001").unwrap(), Some(b"{}".to_vec()));
        ledger.delete("FW001").unwrap();
        assert_eq!(ledger.get("FW001").unwrap(), None);
        assert!(ledger.delete("FW001").is_ok());
    }

    #[test]
    fn rejects_empty_key() {
        let tmp = TempDir::new().unwrap();
        let ledger = open(&tmp);
        assert!(matches!(ledger.put("", b"x"), Err(LedgerError::InvalidKey(_))));
    }

    #[test]
    fn scan_range_bounds() {
        let tmp = TempDir::new().unwrap();
        let ledger = open(&tmp);
        for key in ["a", "b", "c", "d"] {
            ledger.put(key, key.as_bytes()).unwrap();
        }

        let all: Vec<String> = ledger
            .scan_range("", "")
            .unwrap()
            .map(|e| e.unwrap().key)
            .collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);

        let mid: Vec<KV> = ledger
            .scan_range("b", "d")
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(mid.len(), 2);
        assert_eq!(mid[0].key, "b");
        assert_eq!(mid[1].value, b"c".to_vec());

        assert_eq!(ledger.scan_range("d", "a").unwrap().count(), 0);
    }

    #[test]
    fn namespaces_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let firmware = open(&tmp);
        let device = firmware.namespace("device").unwrap();

        firmware.put("K1", b"fw").unwrap();
        device.put("K1", b"dev").unwrap();
        device.put("K2", b"dev").unwrap();

        assert_eq!(firmware.get("K1").unwrap(), Some(b"fw".to_vec()));
        assert_eq!(device.get("K1").unwrap(), Some(b"dev".to_vec()));
        assert_eq!(firmware.scan_range("", "").unwrap().count(), 1);
        assert_eq!(device.scan_range("", "").unwrap().count(), 2);
        assert_eq!(device.namespace_name(), "device");
    }

    #[test]
    fn reopen_keeps_state() {
        let tmp = TempDir::new().unwrap();
        {
            let ledger = open(&tmp);
            ledger.put("DEV1", b"persisted").unwrap();
        }
        let ledger = open(&tmp);
        assert_eq!(ledger.get("DEV1").unwrap(), Some(b"persisted".to_vec()));
    }
}
