//! Ledger errors.

use lockrate_types::{Rate, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("global rate may not increase: current {current}, requested {requested}")]
    RateIncreaseRejected { current: Rate, requested: Rate },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// A zero mint amount or an `Exact(0)` burn/transfer request. An
    /// `All` request that resolves to zero is not an error.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("arithmetic overflow in ledger computation")]
    ArithmeticOverflow,

    #[error("timestamp {now} precedes last accrual at {last}")]
    InvalidTimestamp { last: Timestamp, now: Timestamp },

    #[error("total principal {recorded} does not match sum of holder principals {computed}")]
    ConservationViolated { recorded: u128, computed: u128 },

    #[error("storage error: {0}")]
    Storage(#[from] lockrate_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for LedgerError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
