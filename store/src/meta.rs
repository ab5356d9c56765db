//! Schema bookkeeping trait.

use crate::StoreError;

/// Tracks the on-disk schema version so backends can migrate old databases.
pub trait MetaStore {
    /// Stored schema version, `0` for a database that has never been stamped.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
