//! Hosts the firmware and device contracts over a local redb world state.
//!
//! Each contract gets its own namespace in the database file.

use std::sync::Arc;

use anyhow::Context as _;
use fwchain_core::{Chaincode, ChaincodeConfig};
use fwchain_device::DeviceContract;
use fwchain_firmware::FirmwareContract;
use fwchain_ledger::RedbLedger;
use tracing::info;

pub fn open(config: &ChaincodeConfig) -> anyhow::Result<Chaincode> {
    let path = &config.world_state.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let firmware = RedbLedger::open(path, FirmwareContract::NAME)
        .with_context(|| format!("failed to open world state {}", path.display()))?;
    let device = firmware.namespace(DeviceContract::NAME)?;

    info!(
        world_state = %path.display(),
        decode = ?config.decode,
        "chaincode started"
    );

    Ok(Chaincode::new()
        .with_contract(FirmwareContract::new(Arc::new(firmware)).with_decode_policy(config.decode))
        .with_contract(DeviceContract::new(Arc::new(device)).with_decode_policy(config.decode)))
}
