use std::sync::Arc;

use fwchain_core::{ContractError, DecodePolicy, QueryResult, RecordStore};
use fwchain_ledger::Ledger;

use crate::model::Firmware;

/// Firmware record operations over the world state.
pub struct FirmwareService {
    store: RecordStore<Firmware>,
}

impl FirmwareService {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            store: RecordStore::new(ledger, "firmware"),
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.store = self.store.with_decode_policy(decode);
        self
    }

    /// Lifecycle hook. The world state starts empty.
    pub fn init_ledger(&self) -> Result<(), ContractError> {
        Ok(())
    }

    /// Write `firmware` under `firmware_number`. An existing record at that
    /// key is replaced without being checked.
    pub fn create_firmware(
        &self,
        firmware_number: &str,
        firmware: &Firmware,
    ) -> Result<(), ContractError> {
        self.store.put(firmware_number, firmware)
    }

    pub fn query_firmware(&self, firmware_number: &str) -> Result<Firmware, ContractError> {
        self.store.get(firmware_number)
    }

    pub fn query_all_firmwares(&self) -> Result<Vec<QueryResult<Firmware>>, ContractError> {
        self.store.scan_all()
    }

    pub fn change_firmware_version(
        &self,
        firmware_number: &str,
        new_version: &str,
    ) -> Result<Firmware, ContractError> {
        self.store
            .update(firmware_number, |fw| fw.version = new_version.to_string())
    }

    pub fn change_name(&self, firmware_number: &str, new_name: &str) -> Result<Firmware, ContractError> {
        self.store
            .update(firmware_number, |fw| fw.name = new_name.to_string())
    }

    pub fn change_path(&self, firmware_number: &str, new_path: &str) -> Result<Firmware, ContractError> {
        self.store
            .update(firmware_number, |fw| fw.path = new_path.to_string())
    }

    pub fn delete_firmware(&self, firmware_number: &str) -> Result<(), ContractError> {
        self.store.remove(firmware_number)
    }
}
