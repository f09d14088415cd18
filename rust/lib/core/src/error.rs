use fwchain_ledger::LedgerError;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const DECODE_FAILED: &str = "DECODE_FAILED";
    pub const UNKNOWN_FUNCTION: &str = "UNKNOWN_FUNCTION";
    pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ContractError ───────────────────────────────────────────────────

/// Error returned by every contract operation and entry point.
///
/// Record-store operations only ever produce [`ContractError::NotFound`] and
/// [`ContractError::Storage`]; the remaining variants come from argument
/// handling, strict decoding, and encoding.
#[derive(Error, Debug)]
pub enum ContractError {
    /// No record at the requested key.
    #[error("{0} does not exist")]
    NotFound(String),

    /// The world state rejected a read, write, delete or scan.
    #[error("failed to access world state: {0}")]
    Storage(#[from] LedgerError),

    /// Stored bytes are not a valid record (strict decoding only).
    #[error("record {key} could not be decoded: {reason}")]
    Decode { key: String, reason: String },

    /// The invoked function is not exposed by the contract.
    #[error("function {0} not found")]
    UnknownFunction(String),

    /// Wrong number of string arguments for the invoked function.
    #[error("{function} expects {expected} arguments, got {got}")]
    InvalidArguments {
        function: String,
        expected: usize,
        got: usize,
    },

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ContractError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ContractError::NotFound(_) => error_code::NOT_FOUND,
            ContractError::Storage(_) => error_code::STORAGE_ERROR,
            ContractError::Decode { .. } => error_code::DECODE_FAILED,
            ContractError::UnknownFunction(_) => error_code::UNKNOWN_FUNCTION,
            ContractError::InvalidArguments { .. } => error_code::INVALID_ARGUMENTS,
            ContractError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::NotFound(_))
    }
}
