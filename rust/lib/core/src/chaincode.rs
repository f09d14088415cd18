use tracing::{debug, info};

use crate::contract::{Contract, Payload};
use crate::error::ContractError;

/// Separator between contract name and function in a qualified call,
/// e.g. `firmware:CreateFirmware`.
pub const NAME_SEPARATOR: char = ':';

/// Chaincode routes invocations to the contracts it hosts.
///
/// Unqualified function names go to the first registered contract.
#[derive(Default)]
pub struct Chaincode {
    contracts: Vec<Box<dyn Contract>>,
}

impl Chaincode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract. Builder-style so hosts can chain registrations.
    pub fn with_contract(mut self, contract: impl Contract + 'static) -> Self {
        self.contracts.push(Box::new(contract));
        self
    }

    pub fn contracts(&self) -> impl Iterator<Item = &dyn Contract> {
        self.contracts.iter().map(|c| c.as_ref())
    }

    pub fn contract(&self, name: &str) -> Option<&dyn Contract> {
        self.contracts().find(|c| c.name() == name)
    }

    /// Run every contract's lifecycle hook.
    pub fn init(&self) -> Result<(), ContractError> {
        for contract in &self.contracts {
            contract.init_ledger()?;
            info!(contract = contract.name(), "contract initialized");
        }
        Ok(())
    }

    /// Dispatch `function` (optionally `contract:function`) with `args`.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Payload, ContractError> {
        let (contract, name) = self.resolve(function)?;
        debug!(contract = contract.name(), function = name, args = args.len(), "invoke");
        contract.invoke(name, args)
    }

    fn resolve<'a>(&self, function: &'a str) -> Result<(&dyn Contract, &'a str), ContractError> {
        let unknown = || ContractError::UnknownFunction(function.to_string());
        match function.split_once(NAME_SEPARATOR) {
            Some((contract, name)) => {
                let contract = self.contract(contract).ok_or_else(unknown)?;
                Ok((contract, name))
            }
            None => {
                let contract = self.contracts().next().ok_or_else(unknown)?;
                Ok((contract, function))
            }
        }
    }
}
