use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("storage error: {0}")]
    Storage(String),
}
