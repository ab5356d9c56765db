//! Parsing and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid holder id: {0}")]
    InvalidHolder(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid rate: {0}")]
    InvalidRate(String),

    #[error("unknown rate policy: {0}")]
    UnknownRatePolicy(String),
}
