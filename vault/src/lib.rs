//! Reference vault for the lockrate ledger.
//!
//! A vault takes an underlying asset into custody and mints ledger principal
//! 1:1 at the current global rate. Redemptions burn principal (plus realized
//! interest) and pay the asset back out.

pub mod custody;
pub mod error;
pub mod vault;

pub use custody::{AssetCustody, CustodyError, InMemoryCustody};
pub use error::VaultError;
pub use vault::Vault;
