use lockrate_accrual::LedgerError;
use lockrate_types::HolderId;
use thiserror::Error;

use crate::custody::CustodyError;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("custody error: {0}")]
    Custody(#[from] CustodyError),

    /// The burn committed but the asset could not be paid out. The amount is
    /// owed to the holder until [`crate::Vault::retry_payouts`] settles it.
    #[error("payout of {amount} to {holder} deferred: {reason}")]
    PayoutDeferred {
        holder: HolderId,
        amount: u128,
        reason: CustodyError,
    },
}
