//! Saving and restoring ledger state through a [`LedgerStore`].

use crate::error::LedgerError;
use crate::holders::HolderLedger;
use crate::orchestrator::InterestLedger;
use crate::record::HolderRecord;
use crate::registry::InterestRateRegistry;
use lockrate_store::{LedgerStore, StoreSnapshot};
use lockrate_types::{HolderId, LedgerParams, Rate};
use std::collections::HashMap;

/// Meta key of the bincode-encoded global [`Rate`].
pub const GLOBAL_RATE_KEY: &str = "global_rate";
/// Meta key of the big-endian `u128` total principal.
pub const TOTAL_PRINCIPAL_KEY: &str = "total_principal";

impl InterestLedger {
    /// Persist all ledger state in one atomic snapshot.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        let mut snapshot = self.meta_snapshot()?;
        for (holder, record) in self.holders.iter() {
            snapshot
                .holders
                .push((holder.clone(), bincode::serialize(record)?));
        }
        store.write_snapshot(&snapshot)?;
        tracing::debug!(holders = snapshot.holders.len(), "ledger saved");
        Ok(())
    }

    /// Persist the given holders together with the ledger-wide scalars.
    ///
    /// Enough after an operation that touched only these holders.
    pub fn save_holders<'a, I>(&self, store: &dyn LedgerStore, holders: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = &'a HolderId>,
    {
        let mut snapshot = self.meta_snapshot()?;
        for holder in holders {
            let record = self.holders.record(holder);
            snapshot
                .holders
                .push((holder.clone(), bincode::serialize(&record)?));
        }
        store.write_snapshot(&snapshot)?;
        Ok(())
    }

    /// Restore a ledger, or start a fresh one at `params.initial_rate` when the
    /// store holds no rate yet.
    ///
    /// A stored rate always wins over `params.initial_rate`. Conservation is
    /// checked before the ledger is returned.
    pub fn load_from_store(
        store: &dyn LedgerStore,
        params: &LedgerParams,
    ) -> Result<Self, LedgerError> {
        let rate = match store.get_meta(GLOBAL_RATE_KEY)? {
            Some(bytes) => {
                let stored: Rate = bincode::deserialize(&bytes)?;
                if stored != params.initial_rate {
                    tracing::info!(
                        stored = %stored,
                        configured = %params.initial_rate,
                        "using stored global rate"
                    );
                }
                stored
            }
            None => params.initial_rate,
        };

        let mut records = HashMap::new();
        for (holder, bytes) in store.iter_holders()? {
            let record: HolderRecord = bincode::deserialize(&bytes)?;
            records.insert(holder, record);
        }

        let total = match store.get_meta(TOTAL_PRINCIPAL_KEY)? {
            Some(bytes) => decode_u128(&bytes)?,
            None => {
                let total = records
                    .values()
                    .try_fold(0u128, |acc: u128, r: &HolderRecord| acc.checked_add(r.principal))
                    .ok_or(LedgerError::ArithmeticOverflow)?;
                if total > 0 {
                    tracing::warn!(total, "total principal missing from store, recomputed");
                }
                total
            }
        };
        let holders = HolderLedger::from_parts(records, total);

        let ledger = Self::from_parts(
            InterestRateRegistry::new(rate, params.rate_policy),
            holders,
        );
        ledger.check_conservation()?;
        tracing::debug!(
            holders = ledger.holder_count(),
            rate = %ledger.global_rate(),
            "ledger loaded"
        );
        Ok(ledger)
    }

    fn meta_snapshot(&self) -> Result<StoreSnapshot, LedgerError> {
        Ok(StoreSnapshot {
            holders: Vec::new(),
            meta: vec![
                (
                    GLOBAL_RATE_KEY.to_string(),
                    bincode::serialize(&self.registry.global_rate())?,
                ),
                (
                    TOTAL_PRINCIPAL_KEY.to_string(),
                    self.holders.total_principal().to_be_bytes().to_vec(),
                ),
            ],
        })
    }
}

fn decode_u128(bytes: &[u8]) -> Result<u128, LedgerError> {
    let raw: [u8; 16] = bytes.try_into().map_err(|_| {
        LedgerError::Serialization(format!("expected 16 bytes, found {}", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(raw))
}
