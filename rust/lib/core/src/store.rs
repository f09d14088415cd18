use std::marker::PhantomData;
use std::sync::Arc;

use fwchain_ledger::Ledger;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DecodePolicy;
use crate::error::ContractError;

/// One entry of a full-range query: the world-state key and its record.
///
/// Field names are capitalised on the wire for compatibility with existing
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult<R> {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: R,
}

/// RecordStore maps typed records onto world-state keys as JSON.
///
/// It holds no state of its own beyond the injected ledger handle.
pub struct RecordStore<R> {
    ledger: Arc<dyn Ledger>,
    decode: DecodePolicy,
    kind: &'static str,
    _record: PhantomData<fn() -> R>,
}

impl<R> RecordStore<R>
where
    R: Serialize + DeserializeOwned + Default,
{
    /// `kind` names the record type in log output.
    pub fn new(ledger: Arc<dyn Ledger>, kind: &'static str) -> Self {
        Self {
            ledger,
            decode: DecodePolicy::default(),
            kind,
            _record: PhantomData,
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode
    }

    /// Encode `record` and write it at `key`, replacing whatever was there.
    pub fn put(&self, key: &str, record: &R) -> Result<(), ContractError> {
        let bytes =
            serde_json::to_vec(record).map_err(|e| ContractError::Internal(e.to_string()))?;
        self.ledger.put(key, &bytes)?;
        debug!(kind = self.kind, key, "record written");
        Ok(())
    }

    /// Read and decode the record at `key`.
    pub fn get(&self, key: &str) -> Result<R, ContractError> {
        let bytes = self
            .ledger
            .get(key)?
            .ok_or_else(|| ContractError::NotFound(key.to_string()))?;
        self.decode(key, &bytes)
    }

    /// Read, apply `mutate`, and write the full record back.
    pub fn update(&self, key: &str, mutate: impl FnOnce(&mut R)) -> Result<R, ContractError> {
        let mut record = self.get(key)?;
        mutate(&mut record);
        self.put(key, &record)?;
        Ok(record)
    }

    /// Delete the record at `key`. Fails with `NotFound` if there is none.
    ///
    /// Existence is checked on the raw bytes so an undecodable record can
    /// still be removed under the strict policy.
    pub fn remove(&self, key: &str) -> Result<(), ContractError> {
        if self.ledger.get(key)?.is_none() {
            return Err(ContractError::NotFound(key.to_string()));
        }
        self.ledger.delete(key)?;
        debug!(kind = self.kind, key, "record deleted");
        Ok(())
    }

    /// Decode every record in the world state, in scan order.
    pub fn scan_all(&self) -> Result<Vec<QueryResult<R>>, ContractError> {
        let iter = self.ledger.scan_range("", "")?;

        let mut results = Vec::new();
        for entry in iter {
            let entry = entry?;
            let record = self.decode(&entry.key, &entry.value)?;
            results.push(QueryResult {
                key: entry.key,
                record,
            });
        }

        debug!(kind = self.kind, count = results.len(), "full range scan");
        Ok(results)
    }

    fn decode(&self, key: &str, bytes: &[u8]) -> Result<R, ContractError> {
        match serde_json::from_slice(bytes) {
            Ok(record) => Ok(record),
            Err(e) => match self.decode {
                DecodePolicy::Lenient => {
                    warn!(kind = self.kind, key, error = %e, "undecodable record, returning empty");
                    Ok(R::default())
                }
                DecodePolicy::Strict => Err(ContractError::Decode {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            },
        }
    }
}
