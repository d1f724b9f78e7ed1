//! Decimal helpers used for every monetary and rate computation.
//!
//! All values are [`D256`] decimals; nothing in this crate touches
//! binary floating point when handling amounts or rates.

use fastnum::{D256, dec256, decimal::Context};
use itertools::Itertools;
use serde::{Deserialize, Deserializer};

/// Number of decimal places of the chain's micro-denominations.
pub const MICRO_DECIMALS: u32 = 6;

/// Parses a decimal string, `None` if it is not a finite number.
pub fn parse(value: &str) -> Option<D256> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    D256::from_str(value, Context::default())
        .ok()
        .filter(|d| d.is_finite())
}

pub fn min(a: D256, b: D256) -> D256 {
    if b < a { b } else { a }
}

pub fn max(a: D256, b: D256) -> D256 {
    if b > a { b } else { a }
}

pub fn abs(value: D256) -> D256 {
    value.abs()
}

pub fn floor(value: D256) -> D256 {
    value.floor()
}

/// Integer part of a non-negative value rendered without exponent.
///
/// Returns `None` for negative values.
pub fn to_integer_string(value: D256) -> Option<String> {
    if value.is_negative() {
        return None;
    }
    Some(floor(value).rescale(0).digits().to_string())
}

/// `u128::MAX`, the largest CosmWasm `Uint128`.
const U128_MAX: D256 = dec256!(340282366920938463463374607431768211455);

/// Non-negative and not above `u128::MAX` (CosmWasm `Uint128`).
pub fn fits_u128(value: D256) -> bool {
    !value.is_negative() && value <= U128_MAX
}

/// Integer part of a non-negative value, `None` if negative or wider than `u128`.
pub fn to_u128(value: D256) -> Option<u128> {
    if !fits_u128(value) {
        return None;
    }
    to_integer_string(value)?.parse().ok()
}

/// Fixed-point (micro-unit) to decimal converter.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    decimals: u32,
}

impl Default for Converter {
    fn default() -> Self {
        Self::micro()
    }
}

impl Converter {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    /// Converter for `u`-prefixed denominations (`uusd`, `uluna`, ...).
    pub fn micro() -> Self {
        Self::new(MICRO_DECIMALS)
    }

    fn unit(&self) -> D256 {
        D256::from(10u64.pow(self.decimals))
    }

    /// Smallest-denomination amount to display units.
    pub fn demicrofy(&self, value: D256) -> D256 {
        value / self.unit()
    }

    /// Display units to the smallest denomination, truncated to an integer.
    pub fn microfy(&self, value: D256) -> D256 {
        floor(value * self.unit())
    }
}

/// Formats a non-negative value with `decimals` places, rounding down,
/// and `,` thousands separators.
pub fn format_fixed(value: D256, decimals: u32) -> String {
    let negative = value.is_negative();
    let scaled = floor(abs(value) * D256::from(10u64.pow(decimals)));
    let digits = to_integer_string(scaled).unwrap_or_else(|| "0".to_string());
    let width = decimals as usize + 1;
    let digits = format!("{digits:0>width$}");
    let (int, frac) = digits.split_at(digits.len() - decimals as usize);

    let int = group_thousands(int);
    let sign = if negative && digits.chars().any(|c| c != '0') { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    }
}

/// Display formatting used in receipts: 3 decimals, values of a million
/// and above shown in `M` units.
pub fn format_with_postfix_units(value: D256) -> String {
    let million = D256::from(1_000_000u64);
    if value >= million {
        format!("{}M", format_fixed(value / million, 3))
    } else {
        format_fixed(value, 3)
    }
}

fn group_thousands(int: &str) -> String {
    let rev = int.chars().rev().collect::<Vec<_>>();
    rev.chunks(3)
        .map(|c| c.iter().rev().collect::<String>())
        .rev()
        .join(",")
}

/// Deserializes a decimal encoded as a JSON string (CosmWasm `Decimal256`/`Uint128`).
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<D256, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid decimal: {s}")))
}
