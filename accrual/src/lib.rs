//! The accrual ledger: lazy linear interest with locked-in rates.
//!
//! A holder's redeemable balance is a deterministic function of their own
//! record and the current time:
//! `displayed = principal * (P + locked_rate * (now − last_accrual)) / P`
//!
//! This crate handles:
//! - The global rate and its one-way ratchet (`registry`)
//! - Per-holder principal, rate, and accrual clock (`record`, `holders`)
//! - Computing and realizing accrued interest (`engine`)
//! - Mint, burn, and transfer with rate inheritance (`orchestrator`)
//! - Persistence through `lockrate-store` (`persist`)

pub mod engine;
pub mod error;
pub mod events;
pub mod holders;
pub mod orchestrator;
pub mod persist;
pub mod record;
pub mod registry;

pub use engine::AccrualEngine;
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use holders::HolderLedger;
pub use orchestrator::{InterestLedger, Receipt};
pub use record::HolderRecord;
pub use registry::InterestRateRegistry;
