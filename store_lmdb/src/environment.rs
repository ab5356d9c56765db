//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::ledger::LmdbLedgerStore;
use crate::migration::Migrator;
use crate::LmdbError;

pub const HOLDERS_DB: &str = "holders";
pub const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) holders_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;
    const MAX_DBS: u32 = 4;

    /// Open or create an LMDB environment at `path` and bring its schema up
    /// to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this path
        // and the memory map is never modified outside of heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(Self::MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let holders_db = env.create_database(&mut wtxn, Some(HOLDERS_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            holders_db,
            meta_db,
        };
        Migrator::run(&environment.ledger_store())?;
        tracing::info!(path = %path.display(), map_size, "ledger store opened");
        Ok(environment)
    }

    /// A [`LmdbLedgerStore`] sharing this environment's handles.
    pub fn ledger_store(&self) -> LmdbLedgerStore {
        LmdbLedgerStore::new(Arc::clone(&self.env), self.holders_db, self.meta_db)
    }
}
