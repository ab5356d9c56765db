use std::sync::Arc;

use heed::{types::Bytes, Database, Env};
use lockrate_store::{LedgerStore, MetaStore, StoreError, StoreSnapshot};
use lockrate_types::HolderId;

pub const SCHEMA_VERSION_KEY: &str = "schema_version";

fn backend(e: heed::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Holder records keyed by the UTF-8 holder id, scalars keyed by name.
#[derive(Clone)]
pub struct LmdbLedgerStore {
    env: Arc<Env>,
    holders_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbLedgerStore {
    pub fn new(
        env: Arc<Env>,
        holders_db: Database<Bytes, Bytes>,
        meta_db: Database<Bytes, Bytes>,
    ) -> Self {
        Self {
            env,
            holders_db,
            meta_db,
        }
    }
}

impl LedgerStore for LmdbLedgerStore {
    fn get_holder(&self, holder: &HolderId) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.env.read_txn().map_err(backend)?;
        let value = self
            .holders_db
            .get(&txn, holder.as_str().as_bytes())
            .map_err(backend)?;
        Ok(value.map(<[u8]>::to_vec))
    }

    fn put_holder(&self, holder: &HolderId, record: &[u8]) -> Result<(), StoreError> {
        let mut txn = self.env.write_txn().map_err(backend)?;
        self.holders_db
            .put(&mut txn, holder.as_str().as_bytes(), record)
            .map_err(backend)?;
        txn.commit().map_err(backend)
    }

    fn iter_holders(&self) -> Result<Vec<(HolderId, Vec<u8>)>, StoreError> {
        let txn = self.env.read_txn().map_err(backend)?;
        let mut results = Vec::new();
        for item in self.holders_db.iter(&txn).map_err(backend)? {
            let (key, val) = item.map_err(backend)?;
            let id = std::str::from_utf8(key)
                .map_err(|e| StoreError::Corruption(format!("holder key is not UTF-8: {e}")))?;
            results.push((HolderId::new(id), val.to_vec()));
        }
        Ok(results)
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.env.read_txn().map_err(backend)?;
        let value = self.meta_db.get(&txn, key.as_bytes()).map_err(backend)?;
        Ok(value.map(<[u8]>::to_vec))
    }

    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self.env.write_txn().map_err(backend)?;
        self.meta_db
            .put(&mut txn, key.as_bytes(), value)
            .map_err(backend)?;
        txn.commit().map_err(backend)
    }

    fn write_snapshot(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        // Dropping an uncommitted RwTxn aborts it, so an early return leaves
        // the database untouched.
        let mut txn = self.env.write_txn().map_err(backend)?;
        for (holder, record) in &snapshot.holders {
            self.holders_db
                .put(&mut txn, holder.as_str().as_bytes(), record)
                .map_err(backend)?;
        }
        for (key, value) in &snapshot.meta {
            self.meta_db
                .put(&mut txn, key.as_bytes(), value)
                .map_err(backend)?;
        }
        txn.commit().map_err(backend)?;
        tracing::debug!(
            holders = snapshot.holders.len(),
            meta = snapshot.meta.len(),
            "snapshot committed"
        );
        Ok(())
    }
}

impl MetaStore for LmdbLedgerStore {
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta(SCHEMA_VERSION_KEY)? {
            None => Ok(0),
            Some(bytes) => {
                let arr: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!(
                        "schema version has {} bytes, expected 4",
                        bytes.len()
                    ))
                })?;
                Ok(u32::from_be_bytes(arr))
            }
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_be_bytes())
    }
}
