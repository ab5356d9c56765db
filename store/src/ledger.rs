use crate::StoreError;
use lockrate_types::HolderId;

/// A full image of ledger state, written in one atomic step.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    pub holders: Vec<(HolderId, Vec<u8>)>,
    pub meta: Vec<(String, Vec<u8>)>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty() && self.meta.is_empty()
    }
}

/// Store trait for persisting holder records and ledger-wide scalars.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `lockrate-accrual`
/// crate. The ledger serializes/deserializes its own types.
pub trait LedgerStore {
    fn get_holder(&self, holder: &HolderId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_holder(&self, holder: &HolderId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_holders(&self) -> Result<Vec<(HolderId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Apply every entry of `snapshot` or none of them.
    fn write_snapshot(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError>;
}
