pub mod chaincode;
pub mod config;
pub mod contract;
pub mod error;
pub mod store;

pub use chaincode::Chaincode;
pub use config::{ChaincodeConfig, ConfigError, DecodePolicy};
pub use contract::{Contract, Payload, expect_args, to_payload};
pub use error::ContractError;
pub use store::{QueryResult, RecordStore};
