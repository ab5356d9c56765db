//! Fixed-point per-second interest rates.

use crate::amount::parse_u128;
use crate::error::TypesError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Per-second linear interest rate, fixed-point at [`Rate::SCALE`].
///
/// A holder with principal `p` and rate `r` has `p * (SCALE + r * t) / SCALE`
/// after `t` seconds.
///
/// Binary formats carry the raw `u128`. Human-readable formats write a decimal
/// string and accept either an integer or a string in the notation of
/// [`parse_u128`] (`"5e10"`), since TOML integers stop at `i64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate(u128);

impl Rate {
    /// Fixed-point scale `P = 10^18`.
    pub const SCALE: u128 = 1_000_000_000_000_000_000;

    pub const ZERO: Self = Self(0);

    pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 3600;

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Simple (non-compounded) yearly yield in percent. Display only; ledger
    /// arithmetic never goes through floating point.
    pub fn annual_percentage(&self) -> f64 {
        self.0 as f64 * Self::SECONDS_PER_YEAR as f64 / Self::SCALE as f64 * 100.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rate {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u128(s)
            .map(Self)
            .ok_or_else(|| TypesError::InvalidRate(s.to_string()))
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(RateVisitor)
        } else {
            deserializer.deserialize_u128(RateVisitor)
        }
    }
}

struct RateVisitor;

impl<'de> Visitor<'de> for RateVisitor {
    type Value = Rate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer rate or a string such as \"5e10\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rate, E> {
        Ok(Rate(v as u128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Rate, E> {
        Ok(Rate(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rate, E> {
        u128::try_from(v)
            .map(Rate)
            .map_err(|_| E::custom(format!("rate must be non-negative, got {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rate, E> {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exponent_notation() {
        let r: Rate = "5e10".parse().unwrap();
        assert_eq!(r, Rate::from_raw(50_000_000_000));
        assert!("-1".parse::<Rate>().is_err());
    }

    #[test]
    fn bincode_keeps_full_u128_precision() {
        let r = Rate::from_raw(u128::MAX - 7);
        let bytes = bincode::serialize(&r).unwrap();
        let back: Rate = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, r);
    }

    #[derive(Serialize, Deserialize)]
    struct Holder {
        rate: Rate,
    }

    #[test]
    fn toml_accepts_integer_and_string_forms() {
        let a: Holder = toml::from_str("rate = 50000000000").unwrap();
        let b: Holder = toml::from_str("rate = \"5e10\"").unwrap();
        assert_eq!(a.rate, b.rate);
        assert!(toml::from_str::<Holder>("rate = -3").is_err());
    }

    #[test]
    fn toml_writes_rate_as_string() {
        let out = toml::to_string(&Holder {
            rate: Rate::from_raw(u128::MAX),
        })
        .unwrap();
        let back: Holder = toml::from_str(&out).unwrap();
        assert_eq!(back.rate.raw(), u128::MAX);
    }

    #[test]
    fn annual_percentage_of_one_percent_rate() {
        // 1% per year, rounded down to whole per-second units
        let r = Rate::from_raw(Rate::SCALE / 100 / Rate::SECONDS_PER_YEAR as u128);
        assert!((r.annual_percentage() - 1.0).abs() < 1e-6);
    }
}
