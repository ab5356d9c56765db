//! Fundamental types for the lockrate ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! holder identities, fixed-point rates, amount requests, timestamps, and
//! ledger parameters.

pub mod amount;
pub mod error;
pub mod holder;
pub mod params;
pub mod rate;
pub mod time;

pub use amount::AmountRequest;
pub use error::TypesError;
pub use holder::HolderId;
pub use params::{LedgerParams, RatePolicy};
pub use rate::Rate;
pub use time::{Clock, SystemClock, Timestamp};
