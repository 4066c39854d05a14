//! Decimal unit strings (`"0.001"` <-> `1_000_000_000_000_000` wei)
//!
//! TOML has no 128-bit integers, so configuration and scenario files carry
//! amounts as decimal strings in whole units.

use crate::types::{DECIMALS, ONE_OKB};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUnitsError {
    #[error("empty amount")]
    Empty,
    #[error("invalid digit in amount {0:?}")]
    InvalidDigit(String),
    #[error("more than 18 decimals in {0:?}")]
    TooPrecise(String),
    #[error("amount {0:?} overflows")]
    Overflow(String),
}

/// Parse a decimal amount in whole units into base units (18 decimals)
pub fn parse_units(input: &str) -> Result<u128, ParseUnitsError> {
    let s = input.trim().replace('_', "");
    if s.is_empty() {
        return Err(ParseUnitsError::Empty);
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s.as_str(), ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(ParseUnitsError::Empty);
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseUnitsError::InvalidDigit(input.to_string()));
    }
    if frac.len() > DECIMALS as usize {
        return Err(ParseUnitsError::TooPrecise(input.to_string()));
    }

    let overflow = || ParseUnitsError::Overflow(input.to_string());

    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
        padded.parse().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(ONE_OKB)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Render a base-unit amount as a decimal string, trailing zeros trimmed
/// (`1500000000000000000` -> `"1.5"`).
pub fn format_units(amount: u128) -> String {
    let whole = amount / ONE_OKB;
    let frac = amount % ONE_OKB;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:018}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// `#[serde(with = "launchpad_common::units::serde_units")]`
///
/// Serializes as a decimal string; deserializes from a decimal string or a
/// plain integer of whole units.
pub mod serde_units {
    use super::{format_units, parse_units};
    use crate::types::ONE_OKB;
    use core::fmt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_units(*amount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(UnitsVisitor)
    }

    struct UnitsVisitor;

    impl<'de> Visitor<'de> for UnitsVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount string or an integer of whole units")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            parse_units(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            (v as u128)
                .checked_mul(ONE_OKB)
                .ok_or_else(|| E::custom("amount overflows"))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            if v < 0 {
                return Err(E::custom("negative amount"));
            }
            self.visit_u64(v as u64)
        }
    }
}

/// `Option<u128>` counterpart of [`serde_units`]; pair with `#[serde(default)]`
pub mod serde_units_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
        match amount {
            Some(a) => super::serde_units::serialize(a, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u128>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super::serde_units")] u128);

        Option::<Wrapped>::deserialize(deserializer).map(|w| w.map(|Wrapped(a)| a))
    }
}
