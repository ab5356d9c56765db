//! Per-holder accrual state.

use lockrate_types::{Rate, Timestamp};
use serde::{Deserialize, Serialize};

/// Accrual state for a single holder.
///
/// Every identity implicitly has a default (all-zero) record. A record with
/// zero principal carries no value; the next inbound mint or transfer
/// re-stamps its rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    /// Realized balance: minted and received amounts plus realized interest,
    /// minus burned and sent amounts.
    pub principal: u128,

    /// Rate this holder accrues at until the balance returns to zero.
    pub locked_rate: Rate,

    /// When interest was last folded into `principal`.
    pub last_accrual: Timestamp,
}

impl HolderRecord {
    pub fn new(principal: u128, locked_rate: Rate, last_accrual: Timestamp) -> Self {
        Self {
            principal,
            locked_rate,
            last_accrual,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.principal == 0
    }
}
