use std::collections::VecDeque;

use tracing::debug;

use crate::error::LedgerError;

/// A single world-state entry produced by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KV {
    pub key: String,
    pub value: Vec<u8>,
}

/// Backend side of a range scan. `close` is called exactly once by
/// [`StateIterator`], whether the scan ran to completion or not.
pub trait StateCursor: Send {
    fn next_entry(&mut self) -> Option<Result<KV, LedgerError>>;

    fn close(&mut self) {}
}

/// StateIterator owns an open cursor on the world state.
///
/// The cursor is released by [`StateIterator::close`] or, failing that, when
/// the iterator is dropped. Early returns and `?` on an entry error both
/// release it through `Drop`.
pub struct StateIterator {
    cursor: Option<Box<dyn StateCursor>>,
}

impl StateIterator {
    pub fn new(cursor: impl StateCursor + 'static) -> Self {
        Self {
            cursor: Some(Box::new(cursor)),
        }
    }

    /// An iterator over nothing, with no cursor to release.
    pub fn empty() -> Self {
        Self { cursor: None }
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }

    /// Release the cursor now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
        }
    }
}

impl Iterator for StateIterator {
    type Item = Result<KV, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_mut()?.next_entry()
    }
}

impl Drop for StateIterator {
    fn drop(&mut self) {
        self.release();
    }
}

type CloseHook = Box<dyn FnOnce() + Send>;

/// SnapshotCursor serves entries copied out of the store when the scan was
/// opened, so no storage lock or transaction is held while the caller iterates.
pub struct SnapshotCursor {
    entries: VecDeque<KV>,
    fail_at: Option<usize>,
    served: usize,
    on_close: Option<CloseHook>,
}

impl SnapshotCursor {
    pub fn new(entries: Vec<KV>) -> Self {
        Self {
            entries: entries.into(),
            fail_at: None,
            served: 0,
            on_close: None,
        }
    }

    /// Run `hook` when the cursor is closed.
    pub fn on_close(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// Yield a storage error in place of the entry at position `index`.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl StateCursor for SnapshotCursor {
    fn next_entry(&mut self) -> Option<Result<KV, LedgerError>> {
        if self.fail_at == Some(self.served) {
            self.fail_at = None;
            return Some(Err(LedgerError::Storage(format!(
                "range scan failed at entry {}",
                self.served
            ))));
        }
        let entry = self.entries.pop_front()?;
        self.served += 1;
        Some(Ok(entry))
    }

    fn close(&mut self) {
        debug!(served = self.served, remaining = self.entries.len(), "range cursor closed");
        self.entries.clear();
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}
