//! Holder identity type.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a ledger holder.
///
/// The ledger treats identities as opaque keys. [`HolderId::parse`] applies the
/// textual rules used at the operator boundary: non-empty, at most
/// [`HolderId::MAX_LEN`] bytes, no whitespace or control characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HolderId(String);

impl HolderId {
    pub const MAX_LEN: usize = 128;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate a holder id.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let id = Self(raw.to_string());
        if id.is_valid() {
            Ok(id)
        } else {
            Err(TypesError::InvalidHolder(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= Self::MAX_LEN
            && !self.0.chars().any(|c| c.is_whitespace() || c.is_control())
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HolderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl FromStr for HolderId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_identifiers() {
        let id: HolderId = "alice".parse().unwrap();
        assert_eq!(id.as_str(), "alice");
        assert!(HolderId::parse("0x9f3a").is_ok());
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert!(HolderId::parse("").is_err());
        assert!(HolderId::parse("bob smith").is_err());
        assert!(HolderId::parse("tab\there").is_err());
    }

    #[test]
    fn parse_rejects_overlong_ids() {
        let long = "x".repeat(HolderId::MAX_LEN + 1);
        assert_eq!(
            HolderId::parse(&long),
            Err(TypesError::InvalidHolder(long.clone()))
        );
        assert!(HolderId::parse(&long[1..]).is_ok());
    }
}
