//! Thread-safe handle around a [`ProcessTable`]
//!
//! Create and destroy are not atomic against interleaved mutation, so every
//! top-level command takes the lock once and runs to completion under it.

use crate::core::models::{ProcessId, TableSnapshot};
use crate::core::process_table::ProcessTable;
use crate::error::PcbResult;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedProcessTable {
    inner: Arc<Mutex<ProcessTable>>,
}

impl SharedProcessTable {
    pub fn new(table: ProcessTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    pub fn with_capacity(capacity: usize) -> PcbResult<Self> {
        ProcessTable::new(capacity).map(Self::new)
    }

    /// Run a compound command under a single lock acquisition.
    pub fn with_table<T>(&self, f: impl FnOnce(&mut ProcessTable) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn teardown(&self) -> usize {
        self.inner.lock().teardown()
    }

    pub fn create_child(&self, parent: ProcessId) -> PcbResult<Option<ProcessId>> {
        self.inner.lock().create_child(parent)
    }

    pub fn destroy_descendants(&self, pid: ProcessId) -> Vec<ProcessId> {
        self.inner.lock().destroy_descendants(pid)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn validate(&self) -> PcbResult<()> {
        self.inner.lock().validate()
    }
}
