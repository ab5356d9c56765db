//! Database schema migration engine.
//!
//! Tracks a monotonically increasing schema version in the meta database and
//! runs sequential migration steps to bring an older database up to date.

use lockrate_store::MetaStore;

use crate::LmdbError;

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Runs database migrations to bring the schema up to date.
pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// Version 0 is a fresh database. A stored version higher than
    /// [`CURRENT_SCHEMA_VERSION`] was written by a newer build and is refused.
    pub fn run(meta_store: &impl MetaStore) -> Result<(), LmdbError> {
        let current = meta_store
            .get_schema_version()
            .map_err(|e| LmdbError::Heed(e.to_string()))?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::debug!(version = current, "database schema is up to date");
            return Ok(());
        }

        if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::UnsupportedSchema {
                found: current,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            run_migration(version, version + 1)?;
        }

        meta_store
            .set_schema_version(CURRENT_SCHEMA_VERSION)
            .map_err(|e| LmdbError::Heed(e.to_string()))?;

        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(())
    }
}

fn run_migration(from: u32, to: u32) -> Result<(), LmdbError> {
    match (from, to) {
        // v1: `holders` and `meta` databases, bincode holder records.
        (0, 1) => Ok(()),
        _ => Err(LmdbError::UnknownMigration { from, to }),
    }
}
