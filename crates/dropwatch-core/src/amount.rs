//! Exact token amounts in base units.
//!
//! A [`TokenAmount`] is a non-negative `u128` count of the smallest token unit
//! at [`TOKEN_DECIMALS`](crate::TOKEN_DECIMALS) decimals. Subtraction is
//! floor-clamped at zero; nothing in this module can produce a negative amount.

use crate::{TOKEN_DECIMALS, UNITS_PER_TOKEN};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid digit in amount '{0}'")]
    InvalidDigit(String),
    #[error("amount '{0}' has more than 18 fractional digits")]
    TooPrecise(String),
    #[error("amount '{0}' overflows u128 base units")]
    Overflow(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Whole tokens, no fractional part. Saturates on overflow.
    pub const fn from_tokens(tokens: u128) -> Self {
        Self(tokens.saturating_mul(UNITS_PER_TOKEN))
    }

    pub const fn units(self) -> u128 {
        self.0
    }

    /// Parse a decimal token string such as `35,921,361.0640907` exactly.
    ///
    /// `,` and `_` are accepted as grouping separators. Signs, exponents and
    /// more than 18 fractional digits are rejected.
    pub fn parse_decimal(input: &str) -> Result<Self, AmountError> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        if cleaned.is_empty() {
            return Err(AmountError::Empty);
        }

        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (cleaned.as_str(), ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::InvalidDigit(input.to_string()));
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::InvalidDigit(input.to_string()));
        }
        if frac_part.len() > TOKEN_DECIMALS as usize {
            return Err(AmountError::TooPrecise(input.to_string()));
        }

        let overflow = || AmountError::Overflow(input.to_string());
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_part, width = TOKEN_DECIMALS as usize);
            padded.parse().map_err(|_| overflow())?
        };

        whole
            .checked_mul(UNITS_PER_TOKEN)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// `max(0, self - rhs)`
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Exact `self * num / den`, rounded down. Saturates at `u128::MAX`;
    /// a zero denominator yields zero.
    pub fn scale(self, num: u128, den: u128) -> Self {
        if den == 0 {
            return Self::ZERO;
        }
        let whole = (self.0 / den).checked_mul(num);
        let rest = (self.0 % den).checked_mul(num).map(|r| r / den);
        match (whole, rest) {
            (Some(w), Some(r)) => Self(w.saturating_add(r)),
            _ => Self(u128::MAX),
        }
    }

    /// Multiply by a factor in `[0, 1]`. Non-finite or non-positive factors
    /// give zero, factors of 1 or more give `self`. Goes through f64, so the
    /// result is only accurate to ~15 significant digits.
    pub fn mul_ratio(self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return Self::ZERO;
        }
        if factor >= 1.0 {
            return self;
        }
        Self(((self.0 as f64 * factor) as u128).min(self.0))
    }

    /// `self / den` as f64. `None` when `den` is zero or the quotient is not finite.
    pub fn ratio_to(self, den: Self) -> Option<f64> {
        if den.0 == 0 {
            return None;
        }
        let q = self.0 as f64 / den.0 as f64;
        q.is_finite().then_some(q)
    }

    /// Lossy conversion to whole tokens, for display and fiat valuation only.
    pub fn to_f64_tokens(self) -> f64 {
        self.0 as f64 / UNITS_PER_TOKEN as f64
    }

    /// Grouped rendering with a fixed number of fractional places (truncated),
    /// e.g. `35,921,361.06` for `places = 2`.
    pub fn format_grouped(self, places: usize) -> String {
        let places = places.min(TOKEN_DECIMALS as usize);
        let whole = self.0 / UNITS_PER_TOKEN;
        let frac = self.0 % UNITS_PER_TOKEN;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if places == 0 {
            return grouped;
        }
        let frac_str = format!("{:018}", frac);
        format!("{}.{}", grouped, &frac_str[..places])
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNITS_PER_TOKEN;
        let frac = self.0 % UNITS_PER_TOKEN;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let frac_str = format!("{:018}", frac);
        write!(f, "{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

// TOML has no u128, so amounts round-trip as decimal token strings.
impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{self, Visitor};
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal token amount as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TokenAmount, E> {
                TokenAmount::parse_decimal(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TokenAmount, E> {
                Ok(TokenAmount::from_tokens(v as u128))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TokenAmount, E> {
                if v >= 0 {
                    Ok(TokenAmount::from_tokens(v as u128))
                } else {
                    Err(E::custom("negative token amount"))
                }
            }
        }

        d.deserialize_any(AmountVisitor)
    }
}
