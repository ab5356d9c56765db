use std::collections::BTreeMap;

use lockrate_accrual::{InterestLedger, Receipt};
use lockrate_types::{AmountRequest, Clock, HolderId, Rate};

use crate::custody::AssetCustody;
use crate::error::VaultError;

/// Backs ledger principal 1:1 with an asset held by `A`, reading time from `C`.
pub struct Vault<A: AssetCustody, C: Clock> {
    ledger: InterestLedger,
    custody: A,
    clock: C,
    owed: BTreeMap<HolderId, u128>,
}

impl<A: AssetCustody, C: Clock> Vault<A, C> {
    pub fn new(ledger: InterestLedger, custody: A, clock: C) -> Self {
        Self {
            ledger,
            custody,
            clock,
            owed: BTreeMap::new(),
        }
    }

    /// Take `amount` of the asset from `holder` and mint the same principal at
    /// the current global rate. A failed mint returns the asset.
    pub fn deposit(&mut self, holder: &HolderId, amount: u128) -> Result<Receipt, VaultError> {
        self.custody.receive(holder, amount)?;
        let now = self.clock.now();
        match self.ledger.mint_at_global_rate(holder, amount, now) {
            Ok(receipt) => {
                tracing::debug!(holder = %holder, amount, "deposit accepted");
                Ok(receipt)
            }
            Err(err) => {
                if let Err(refund) = self.custody.pay(holder, amount) {
                    tracing::warn!(holder = %holder, amount, error = %refund, "deposit refund deferred");
                    self.add_owed(holder, amount);
                }
                Err(err.into())
            }
        }
    }

    /// Burn principal and pay the burned amount out.
    ///
    /// When the payout fails the burn stays committed and the amount is owed
    /// to the holder; the error is [`VaultError::PayoutDeferred`].
    pub fn redeem(
        &mut self,
        holder: &HolderId,
        request: AmountRequest,
    ) -> Result<Receipt, VaultError> {
        let now = self.clock.now();
        let receipt = self.ledger.burn(holder, request, now)?;
        if receipt.amount == 0 {
            return Ok(receipt);
        }
        match self.custody.pay(holder, receipt.amount) {
            Ok(()) => Ok(receipt),
            Err(reason) => {
                tracing::warn!(holder = %holder, amount = receipt.amount, error = %reason, "payout deferred");
                self.add_owed(holder, receipt.amount);
                Err(VaultError::PayoutDeferred {
                    holder: holder.clone(),
                    amount: receipt.amount,
                    reason,
                })
            }
        }
    }

    /// Retry every owed payout. Returns how many were settled; the rest stay
    /// owed.
    pub fn retry_payouts(&mut self) -> usize {
        let mut settled = 0;
        let owed = std::mem::take(&mut self.owed);
        for (holder, amount) in owed {
            match self.custody.pay(&holder, amount) {
                Ok(()) => settled += 1,
                Err(reason) => {
                    tracing::debug!(holder = %holder, amount, error = %reason, "payout still deferred");
                    self.owed.insert(holder, amount);
                }
            }
        }
        if settled > 0 {
            tracing::info!(settled, remaining = self.owed.len(), "owed payouts settled");
        }
        settled
    }

    /// Displayed balance at the clock's current reading.
    pub fn balance(&self, holder: &HolderId) -> u128 {
        self.ledger.displayed_balance(holder, self.clock.now())
    }

    pub fn lower_rate(&mut self, rate: Rate) -> Result<(), VaultError> {
        self.ledger.set_global_rate(rate)?;
        Ok(())
    }

    pub fn owed(&self, holder: &HolderId) -> u128 {
        self.owed.get(holder).copied().unwrap_or(0)
    }

    pub fn total_owed(&self) -> u128 {
        self.owed.values().fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    pub fn ledger(&self) -> &InterestLedger {
        &self.ledger
    }

    pub fn custody(&self) -> &A {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut A {
        &mut self.custody
    }

    fn add_owed(&mut self, holder: &HolderId, amount: u128) {
        let entry = self.owed.entry(holder.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}
