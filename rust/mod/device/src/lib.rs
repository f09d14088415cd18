pub mod model;
pub mod service;

use std::sync::Arc;

use fwchain_core::{Contract, ContractError, DecodePolicy, Payload, expect_args, to_payload};
use fwchain_ledger::Ledger;

pub use model::Device;
pub use service::DeviceService;

/// Entry points exposed by [`DeviceContract`].
pub const FUNCTIONS: &[&str] = &[
    "InitLedger",
    "CreateDevice",
    "QueryDevice",
    "QueryAllDevices",
    "DeleteDevice",
];

/// Device contract. Records can be created, read and deleted; there are no
/// field-level updates.
pub struct DeviceContract {
    service: DeviceService,
}

impl DeviceContract {
    pub const NAME: &'static str = "device";

    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            service: DeviceService::new(ledger),
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.service = self.service.with_decode_policy(decode);
        self
    }

    pub fn service(&self) -> &DeviceService {
        &self.service
    }
}

impl Contract for DeviceContract {
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
            "CreateDevice" => {
                let [key, id, uuid, servicenumber, version, date] =
                    expect_args::<6>(function, args)?;
                let device = Device {
                    id: id.to_string(),
                    uuid: uuid.to_string(),
                    servicenumber: servicenumber.to_string(),
                    version: version.to_string(),
                    date: date.to_string(),
                };
                self.service.create_device(key, &device)?;
                Ok(None)
            }
            "QueryDevice" => {
                let [key] = expect_args::<1>(function, args)?;
                to_payload(&self.service.query_device(key)?)
            }
            "QueryAllDevices" => {
                expect_args::<0>(function, args)?;
                to_payload(&self.service.query_all_devices()?)
            }
            "DeleteDevice" => {
                let [key] = expect_args::<1>(function, args)?;
                self.service.delete_device(key)?;
                Ok(None)
            }
            _ => Err(ContractError::UnknownFunction(function.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use fwchain_ledger::MemoryLedger;
    use serde_json::json;

    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn contract() -> DeviceContract {
        DeviceContract::new(Arc::new(MemoryLedger::new()))
    }

    #[test]
    fn create_query_delete() {
        let c = contract();
        c.invoke(
            "CreateDevice",
            &args(&["DEV001", "1", "uuid-1", "S1", "1.0", "2024-01-01"]),
        )
        .unwrap();

        assert_eq!(
            c.invoke("QueryDevice", &args(&["DEV001"])).unwrap(),
            Some(json!({
                "id": "1",
                "uuid": "uuid-1",
                "servicenumber": "S1",
                "version": "1.0",
                "date": "2024-01-01",
            }))
        );

        let all = c.invoke("QueryAllDevices", &[]).unwrap().unwrap();
        assert_eq!(all[0]["Key"], "DEV001");
        assert_eq!(all[0]["Record"]["uuid"], "uuid-1");

        assert_eq!(c.invoke("DeleteDevice", &args(&["DEV001"])).unwrap(), None);
        let err = c.invoke("QueryDevice", &args(&["DEV001"])).unwrap_err();
        assert_eq!(err.to_string(), "DEV001 does not exist");
    }

    #[test]
    fn no_update_entry_points() {
        let c = contract();
        for function in ["ChangeFirmwareVersion", "ChangeName", "ChangePath", "UpdateDevice"] {
            assert!(matches!(
                c.invoke(function, &args(&["DEV001", "x"])),
                Err(ContractError::UnknownFunction(_))
            ));
        }
        assert!(!c.functions().iter().any(|f| f.starts_with("Change")));
    }

    #[test]
    fn argument_count_checked() {
        let c = contract();
        let err = c.invoke("CreateDevice", &args(&["DEV001"])).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENTS");
        assert_eq!(err.to_string(), "CreateDevice expects 6 arguments, got 1");
    }
}
