//! Rendering command results as text or JSON.

use std::fmt;

use lockrate_accrual::{InterestLedger, LedgerEvent, Receipt};
use lockrate_types::{HolderId, Rate, RatePolicy, Timestamp};
use lockrate_utils::{format_duration, format_units};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptView {
    pub amount: u128,
    pub interest_realized: u128,
}

impl From<Receipt> for ReceiptView {
    fn from(r: Receipt) -> Self {
        Self {
            amount: r.amount,
            interest_realized: r.interest_realized,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HolderView {
    pub holder: HolderId,
    pub principal: u128,
    pub displayed: u128,
    pub locked_rate: Rate,
    pub last_accrual: Timestamp,
    /// Seconds since interest was last realized.
    pub idle_secs: u64,
}

impl HolderView {
    pub fn of(ledger: &InterestLedger, holder: &HolderId, now: Timestamp) -> Self {
        let record = ledger.record(holder);
        Self {
            holder: holder.clone(),
            principal: record.principal,
            displayed: ledger.displayed_balance(holder, now),
            locked_rate: record.locked_rate,
            last_accrual: record.last_accrual,
            idle_secs: record.last_accrual.elapsed_since(now),
        }
    }
}

impl fmt::Display for HolderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (principal {}, rate {}, idle {})",
            self.holder,
            format_units(self.displayed),
            format_units(self.principal),
            self.locked_rate,
            format_duration(self.idle_secs)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    Rate {
        global_rate: Rate,
        policy: RatePolicy,
        annual_percentage: f64,
    },
    RateSet {
        from: Rate,
        to: Rate,
    },
    Minted {
        receipt: ReceiptView,
        holder: HolderView,
    },
    Burned {
        receipt: ReceiptView,
        holder: HolderView,
    },
    Transferred {
        receipt: ReceiptView,
        sender: HolderView,
        recipient: HolderView,
    },
    Balance(HolderView),
    Holders {
        total_principal: u128,
        holders: Vec<HolderView>,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Rate {
                global_rate,
                policy,
                annual_percentage,
            } => write!(
                f,
                "global rate {global_rate} ({annual_percentage:.4}% per year, policy {policy})"
            ),
            Report::RateSet { from, to } => write!(f, "global rate {from} -> {to}"),
            Report::Minted { receipt, holder } => write!(
                f,
                "minted {} (realized {})\n{holder}",
                format_units(receipt.amount),
                format_units(receipt.interest_realized)
            ),
            Report::Burned { receipt, holder } => write!(
                f,
                "burned {} (realized {})\n{holder}",
                format_units(receipt.amount),
                format_units(receipt.interest_realized)
            ),
            Report::Transferred {
                receipt,
                sender,
                recipient,
            } => write!(
                f,
                "transferred {} (realized {})\n{sender}\n{recipient}",
                format_units(receipt.amount),
                format_units(receipt.interest_realized)
            ),
            Report::Balance(view) => write!(f, "{view}"),
            Report::Holders {
                total_principal,
                holders,
            } => {
                for view in holders {
                    writeln!(f, "{view}")?;
                }
                write!(
                    f,
                    "{} holders, total principal {}",
                    holders.len(),
                    format_units(*total_principal)
                )
            }
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    result: &'a Report,
    events: &'a [LedgerEvent],
}

/// Render a report, with the events it produced when rendering JSON.
pub fn render(report: &Report, events: &[LedgerEvent], json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&JsonOutput {
            result: report,
            events,
        })
    } else {
        Ok(report.to_string())
    }
}
