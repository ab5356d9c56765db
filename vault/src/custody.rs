//! Custody of the underlying asset.

use std::collections::HashMap;

use lockrate_types::HolderId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("{holder} has {available} of the asset, {needed} needed")]
    InsufficientFunds {
        holder: HolderId,
        needed: u128,
        available: u128,
    },

    #[error("custody reserve holds {available}, {needed} needed")]
    InsufficientReserve { needed: u128, available: u128 },

    #[error("custody unavailable: {0}")]
    Unavailable(String),
}

/// Moves the underlying asset between holders and the vault's reserve.
pub trait AssetCustody {
    /// Pull `amount` from `from` into the reserve.
    fn receive(&mut self, from: &HolderId, amount: u128) -> Result<(), CustodyError>;

    /// Pay `amount` from the reserve to `to`.
    fn pay(&mut self, to: &HolderId, amount: u128) -> Result<(), CustodyError>;

    fn reserve(&self) -> u128;
}

/// Asset custody held in memory, for tests and simulations.
///
/// Interest is paid out of the reserve, so a sponsor has to
/// [`fund_reserve`](Self::fund_reserve) for redemptions to exceed deposits.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    wallets: HashMap<HolderId, u128>,
    reserve: u128,
    payouts_offline: bool,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of the asset to a holder's external wallet.
    pub fn fund(&mut self, holder: &HolderId, amount: u128) {
        let wallet = self.wallets.entry(holder.clone()).or_insert(0);
        *wallet = wallet.saturating_add(amount);
    }

    pub fn fund_reserve(&mut self, amount: u128) {
        self.reserve = self.reserve.saturating_add(amount);
    }

    pub fn wallet(&self, holder: &HolderId) -> u128 {
        self.wallets.get(holder).copied().unwrap_or(0)
    }

    /// Make every subsequent [`pay`](AssetCustody::pay) fail until reset.
    pub fn set_payouts_offline(&mut self, offline: bool) {
        self.payouts_offline = offline;
    }
}

impl AssetCustody for InMemoryCustody {
    fn receive(&mut self, from: &HolderId, amount: u128) -> Result<(), CustodyError> {
        let available = self.wallet(from);
        if available < amount {
            return Err(CustodyError::InsufficientFunds {
                holder: from.clone(),
                needed: amount,
                available,
            });
        }
        let reserve = self
            .reserve
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Unavailable("reserve overflow".into()))?;
        self.wallets.insert(from.clone(), available - amount);
        self.reserve = reserve;
        Ok(())
    }

    fn pay(&mut self, to: &HolderId, amount: u128) -> Result<(), CustodyError> {
        if self.payouts_offline {
            return Err(CustodyError::Unavailable("payouts offline".into()));
        }
        if self.reserve < amount {
            return Err(CustodyError::InsufficientReserve {
                needed: amount,
                available: self.reserve,
            });
        }
        self.reserve -= amount;
        self.fund(to, amount);
        Ok(())
    }

    fn reserve(&self) -> u128 {
        self.reserve
    }
}
