use std::sync::Arc;

use fwchain_core::{ContractError, DecodePolicy, QueryResult, RecordStore};
use fwchain_ledger::Ledger;

use crate::model::Device;

/// Device record operations over the world state.
pub struct DeviceService {
    store: RecordStore<Device>,
}

impl DeviceService {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            store: RecordStore::new(ledger, "device"),
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.store = self.store.with_decode_policy(decode);
        self
    }

    pub fn init_ledger(&self) -> Result<(), ContractError> {
        Ok(())
    }

    /// Write `device` under `device_number`, replacing any existing record.
    pub fn create_device(&self, device_number: &str, device: &Device) -> Result<(), ContractError> {
        self.store.put(device_number, device)
    }

    pub fn query_device(&self, device_number: &str) -> Result<Device, ContractError> {
        self.store.get(device_number)
    }

    pub fn query_all_devices(&self) -> Result<Vec<QueryResult<Device>>, ContractError> {
        self.store.scan_all()
    }

    pub fn delete_device(&self, device_number: &str) -> Result<(), ContractError> {
        self.store.remove(device_number)
    }
}
