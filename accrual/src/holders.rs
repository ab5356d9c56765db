//! Authoritative per-holder principal store.

use crate::record::HolderRecord;
use lockrate_types::{HolderId, Rate};
use std::collections::HashMap;

/// Holder records keyed by identity, plus the running total of principal.
///
/// Absent holders read as [`HolderRecord::default`]. Records are never removed.
#[derive(Clone, Debug, Default)]
pub struct HolderLedger {
    records: HashMap<HolderId, HolderRecord>,
    total_principal: u128,
}

impl HolderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(records: HashMap<HolderId, HolderRecord>, total_principal: u128) -> Self {
        Self {
            records,
            total_principal,
        }
    }

    /// The holder's record, or the all-zero default for an unknown holder.
    pub fn record(&self, holder: &HolderId) -> HolderRecord {
        self.records.get(holder).copied().unwrap_or_default()
    }

    pub fn principal(&self, holder: &HolderId) -> u128 {
        self.record(holder).principal
    }

    pub fn locked_rate(&self, holder: &HolderId) -> Rate {
        self.record(holder).locked_rate
    }

    pub fn contains(&self, holder: &HolderId) -> bool {
        self.records.contains_key(holder)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HolderId, &HolderRecord)> {
        self.records.iter()
    }

    /// Sum of principal across holders as tracked incrementally.
    pub fn total_principal(&self) -> u128 {
        self.total_principal
    }

    /// Recompute the principal sum from the records, `None` on overflow.
    pub fn sum_principal(&self) -> Option<u128> {
        self.records
            .values()
            .try_fold(0u128, |acc, r| acc.checked_add(r.principal))
    }

    /// Write back records produced by a fully validated operation.
    pub(crate) fn commit<I>(&mut self, records: I, total_principal: u128)
    where
        I: IntoIterator<Item = (HolderId, HolderRecord)>,
    {
        self.records.extend(records);
        self.total_principal = total_principal;
    }
}
