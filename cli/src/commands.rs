//! Subcommands and their execution against a loaded ledger.

use clap::Subcommand;
use lockrate_accrual::{InterestLedger, LedgerError};
use lockrate_types::amount::parse_u128;
use lockrate_types::{AmountRequest, HolderId, Rate, Timestamp, TypesError};

use crate::output::{HolderView, Report};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the global rate and the rate policy.
    Rate,

    /// Lower the global rate. Raising it is always refused.
    SetRate {
        /// New per-second rate at scale 1e18, e.g. `4e10`.
        rate: Rate,
    },

    /// Create principal for a holder.
    Mint {
        holder: HolderId,
        #[arg(value_parser = parse_amount)]
        amount: u128,
        /// Lock the holder into this rate instead of the global rate.
        #[arg(long)]
        rate: Option<Rate>,
    },

    /// Destroy principal. `all` burns the full displayed balance.
    Burn {
        holder: HolderId,
        amount: AmountRequest,
    },

    /// Move principal between holders. `all` moves the sender's full balance.
    Transfer {
        from: HolderId,
        to: HolderId,
        amount: AmountRequest,
    },

    /// Show one holder's balance.
    Balance { holder: HolderId },

    /// List every holder.
    Holders,
}

fn parse_amount(s: &str) -> Result<u128, TypesError> {
    parse_u128(s).ok_or_else(|| TypesError::InvalidAmount(s.to_string()))
}

/// Result of running a command: what to show, and which holders to persist.
#[derive(Debug)]
pub struct Outcome {
    pub report: Report,
    /// `None` for read-only commands. `Some(vec![])` persists only the
    /// ledger-wide scalars.
    pub touched: Option<Vec<HolderId>>,
}

impl Outcome {
    fn read_only(report: Report) -> Self {
        Self {
            report,
            touched: None,
        }
    }

    fn mutated(report: Report, touched: Vec<HolderId>) -> Self {
        Self {
            report,
            touched: Some(touched),
        }
    }
}

impl Command {
    pub fn execute(&self, ledger: &mut InterestLedger, now: Timestamp) -> Result<Outcome, LedgerError> {
        match self {
            Command::Rate => Ok(Outcome::read_only(Report::Rate {
                global_rate: ledger.global_rate(),
                policy: ledger.registry().policy(),
                annual_percentage: ledger.global_rate().annual_percentage(),
            })),
            Command::SetRate { rate } => {
                let from = ledger.global_rate();
                ledger.set_global_rate(*rate)?;
                Ok(Outcome::mutated(Report::RateSet { from, to: *rate }, Vec::new()))
            }
            Command::Mint {
                holder,
                amount,
                rate,
            } => {
                let rate = rate.unwrap_or_else(|| ledger.global_rate());
                let receipt = ledger.mint(holder, *amount, rate, now)?;
                Ok(Outcome::mutated(
                    Report::Minted {
                        receipt: receipt.into(),
                        holder: HolderView::of(ledger, holder, now),
                    },
                    vec![holder.clone()],
                ))
            }
            Command::Burn { holder, amount } => {
                let receipt = ledger.burn(holder, *amount, now)?;
                Ok(Outcome::mutated(
                    Report::Burned {
                        receipt: receipt.into(),
                        holder: HolderView::of(ledger, holder, now),
                    },
                    vec![holder.clone()],
                ))
            }
            Command::Transfer { from, to, amount } => {
                let receipt = ledger.transfer(from, to, *amount, now)?;
                let mut touched = vec![from.clone()];
                if from != to {
                    touched.push(to.clone());
                }
                Ok(Outcome::mutated(
                    Report::Transferred {
                        receipt: receipt.into(),
                        sender: HolderView::of(ledger, from, now),
                        recipient: HolderView::of(ledger, to, now),
                    },
                    touched,
                ))
            }
            Command::Balance { holder } => Ok(Outcome::read_only(Report::Balance(
                HolderView::of(ledger, holder, now),
            ))),
            Command::Holders => {
                let ledger: &InterestLedger = ledger;
                let mut holders: Vec<HolderView> = ledger
                    .holders()
                    .iter()
                    .map(|(id, _)| HolderView::of(ledger, id, now))
                    .collect();
                holders.sort_by(|a, b| a.holder.cmp(&b.holder));
                Ok(Outcome::read_only(Report::Holders {
                    total_principal: ledger.total_principal(),
                    holders,
                }))
            }
        }
    }
}
