pub mod model;
pub mod service;

use std::sync::Arc;

use fwchain_core::{Contract, ContractError, DecodePolicy, Payload, expect_args, to_payload};
use fwchain_ledger::Ledger;

pub use model::Firmware;
pub use service::FirmwareService;

/// Entry points exposed by [`FirmwareContract`].
pub const FUNCTIONS: &[&str] = &[
    "InitLedger",
    "CreateFirmware",
    "QueryFirmware",
    "QueryAllFirmwares",
    "ChangeFirmwareVersion",
    "ChangeName",
    "ChangePath",
    "DeleteFirmware",
];

/// Firmware contract — string-argument entry points over [`FirmwareService`].
pub struct FirmwareContract {
    service: FirmwareService,
}

impl FirmwareContract {
    pub const NAME: &'static str = "firmware";

    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            service: FirmwareService::new(ledger),
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.service = self.service.with_decode_policy(decode);
        self
    }

    pub fn service(&self) -> &FirmwareService {
        &self.service
    }
}

impl Contract for FirmwareContract {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn init_ledger(&self) -> Result<(), ContractError> {
        self.service.init_ledger()
    }

    fn invoke(&self, function: &str, args: &[String]) -> Result<Payload, ContractError> {
        match function {
            "InitLedger" => {
                expect_args::<0>(function, args)?;
                self.service.init_ledger()?;
                Ok(None)
            }
            "CreateFirmware" => {
                let [key, id, name, version, path, date, service_number_id] =
                    expect_args::<7>(function, args)?;
                let firmware = Firmware {
                    id: id.to_string(),
                    name: name.to_string(),
                    version: version.to_string(),
                    path: path.to_string(),
                    date: date.to_string(),
                    service_number_id: service_number_id.to_string(),
                };
                self.service.create_firmware(key, &firmware)?;
                Ok(None)
            }
            "QueryFirmware" => {
                let [key] = expect_args::<1>(function, args)?;
                to_payload(&self.service.query_firmware(key)?)
            }
            "QueryAllFirmwares" => {
                expect_args::<0>(function, args)?;
                to_payload(&self.service.query_all_firmwares()?)
            }
            "ChangeFirmwareVersion" => {
                let [key, new_version] = expect_args::<2>(function, args)?;
                self.service.change_firmware_version(key, new_version)?;
                Ok(None)
            }
            "ChangeName" => {
                let [key, new_name] = expect_args::<2>(function, args)?;
                self.service.change_name(key, new_name)?;
                Ok(None)
            }
            "ChangePath" => {
                let [key, new_path] = expect_args::<2>(function, args)?;
                self.service.change_path(key, new_path)?;
                Ok(None)
            }
            "DeleteFirmware" => {
                let [key] = expect_args::<1>(function, args)?;
                self.service.delete_firmware(key)?;
                Ok(None)
            }
            _ => Err(ContractError::UnknownFunction(function.to_string())),
        }
    }
}
