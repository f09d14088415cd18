use serde::Serialize;

use crate::error::ContractError;

/// Result of an entry point: a JSON document, or nothing for writes.
pub type Payload = Option<serde_json::Value>;

/// A smart contract that exposes named entry points.
///
/// Each record store (firmware, device, ...) implements this trait; the
/// [`Chaincode`](crate::Chaincode) router collects them and dispatches
/// invocations by function name. Every argument arrives as a string.
pub trait Contract: Send + Sync {
    /// Contract name, used for logging and as the function-name qualifier.
    fn name(&self) -> &str;

    /// Entry points accepted by [`Contract::invoke`], in declaration order.
    fn functions(&self) -> &'static [&'static str];

    /// Lifecycle hook run when the chaincode is instantiated.
    fn init_ledger(&self) -> Result<(), ContractError>;

    /// Run the entry point `function` with `args`.
    fn invoke(&self, function: &str, args: &[String]) -> Result<Payload, ContractError>;
}

/// Check the argument count of `function` and borrow the arguments as `&str`.
pub fn expect_args<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<[&'a str; N], ContractError> {
    if args.len() != N {
        return Err(ContractError::InvalidArguments {
            function: function.to_string(),
            expected: N,
            got: args.len(),
        });
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

/// Encode a return value as an entry-point payload.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Payload, ContractError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| ContractError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expect_args_borrows_in_order() {
        let input = args(&["FW001", "1.1"]);
        let [key, version] = expect_args::<2>("ChangeFirmwareVersion", &input).unwrap();
        assert_eq!(key, "FW001");
        assert_eq!(version, "1.1");
    }

    #[test]
    fn expect_args_rejects_wrong_count() {
        let input = args(&["FW001"]);
        let err = expect_args::<2>("ChangeName", &input).unwrap_err();
        assert!(matches!(
            err,
            ContractError::InvalidArguments { expected: 2, got: 1, .. }
        ));
        assert!(expect_args::<0>("InitLedger", &[]).is_ok());
    }

    #[test]
    fn payload_is_json() {
        let payload = to_payload(&vec!["a", "b"]).unwrap();
        assert_eq!(payload, Some(serde_json::json!(["a", "b"])));
    }
}
