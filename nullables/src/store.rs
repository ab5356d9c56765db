//! Nullable store: thread-safe in-memory ledger storage for testing.

use lockrate_store::{LedgerStore, StoreError, StoreSnapshot};
use lockrate_types::HolderId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory ledger store.
///
/// `write_snapshot` applies under a single lock, so readers never observe a
/// partially written snapshot. [`NullLedgerStore::fail_writes`] makes every
/// subsequent write fail, for exercising error paths.
#[derive(Default)]
pub struct NullLedgerStore {
    holders: Mutex<HashMap<HolderId, Vec<u8>>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: Mutex<bool>,
}

impl NullLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn holder_count(&self) -> usize {
        self.holders.lock().unwrap().len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        Ok(())
    }
}

impl LedgerStore for NullLedgerStore {
    fn get_holder(&self, holder: &HolderId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.holders.lock().unwrap().get(holder).cloned())
    }

    fn put_holder(&self, holder: &HolderId, record: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.holders
            .lock()
            .unwrap()
            .insert(holder.clone(), record.to_vec());
        Ok(())
    }

    fn iter_holders(&self) -> Result<Vec<(HolderId, Vec<u8>)>, StoreError> {
        Ok(self
            .holders
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn write_snapshot(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut holders = self.holders.lock().unwrap();
        let mut meta = self.meta.lock().unwrap();
        for (holder, bytes) in &snapshot.holders {
            holders.insert(holder.clone(), bytes.clone());
        }
        for (key, value) in &snapshot.meta {
            meta.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}
