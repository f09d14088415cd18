pub mod error;
pub mod iterator;
pub mod memory;
pub mod redb;
pub mod traits;

pub use error::LedgerError;
pub use iterator::{KV, SnapshotCursor, StateCursor, StateIterator};
pub use memory::{LedgerOp, MemoryLedger};
pub use self::redb::RedbLedger;
pub use traits::Ledger;
