//! Fixed-point arithmetic for rulebook values.
//!
//! Every rule value (points, attribute scores, thresholds) is an [`Fxp`]: a
//! signed 64-bit integer holding the value scaled by 10⁴. Four fractional
//! digits cover both quarter-point and thousandth precision, and integer
//! arithmetic keeps thousands of dependent calculations free of floating-point
//! drift.
//!
//! ## Overflow
//!
//! Operators saturate to [`Fxp::MIN`] / [`Fxp::MAX`] instead of wrapping.
//! `Fxp::MIN` doubles as the "attribute ID could not be resolved" sentinel.
//!
//! ## Examples
//!
//! ```
//! # use sheet_core::fxp::Fxp;
//! let speed: Fxp = "5.25".parse().unwrap();
//! assert_eq!((speed * Fxp::from_int(2)).to_string(), "10.5");
//! assert_eq!(speed.floor(), Fxp::from_int(5));
//! ```

mod text;

#[cfg(feature = "serde")]
mod serde_impl;

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{ErrorSeverity, SheetError};

/// Number of fractional decimal digits.
pub const DIGITS: u32 = 4;

/// Raw units per whole number.
pub const SCALE: i64 = 10_i64.pow(DIGITS);

/// Errors raised by fixed-point parsing and division.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FxpError {
    /// Text does not describe a number in range.
    #[error("malformed number: {text:?}")]
    MalformedNumber { text: String },

    /// Division by zero. Configured formulas use constant divisors, so this
    /// indicates a data-integrity bug rather than a user error.
    #[error("division by zero")]
    DivisionByZero,
}

impl SheetError for FxpError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedNumber { .. } => ErrorSeverity::Validation,
            Self::DivisionByZero => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedNumber { .. } => "FXP_MALFORMED_NUMBER",
            Self::DivisionByZero => "FXP_DIVISION_BY_ZERO",
        }
    }
}

/// A deterministic decimal value with four fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fxp(i64);

impl Fxp {
    /// Smallest value; also the "unresolved" sentinel.
    pub const MIN: Self = Self(i64::MIN);
    /// Largest value.
    pub const MAX: Self = Self(i64::MAX);

    pub const ZERO: Self = Self(0);
    pub const HALF: Self = Self(SCALE / 2);
    pub const ONE: Self = Self(SCALE);
    pub const TWO: Self = Self(2 * SCALE);
    pub const EIGHTY: Self = Self(80 * SCALE);
    pub const HUNDRED: Self = Self(100 * SCALE);

    /// Wraps a raw scaled value (`1.0` is `SCALE`).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw scaled value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Converts a whole number, saturating on overflow.
    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(SCALE))
    }

    /// Returns the integer part, truncated toward zero.
    pub const fn as_int(self) -> i64 {
        self.0 / SCALE
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when this is the unresolved sentinel.
    pub const fn is_unresolved(self) -> bool {
        self.0 == i64::MIN
    }

    /// Divides, failing on a zero divisor. Results saturate like the operators.
    pub fn div(self, rhs: Self) -> Result<Self, FxpError> {
        if rhs.0 == 0 {
            return Err(FxpError::DivisionByZero);
        }
        Ok(saturate((self.0 as i128 * SCALE as i128) / rhs.0 as i128))
    }

    /// Largest whole number less than or equal to this value.
    pub fn floor(self) -> Self {
        let rem = self.0 % SCALE;
        if rem < 0 {
            Self((self.0 - rem).saturating_sub(SCALE))
        } else {
            Self(self.0 - rem)
        }
    }

    /// Smallest whole number greater than or equal to this value.
    pub fn ceil(self) -> Self {
        let rem = self.0 % SCALE;
        if rem > 0 {
            Self((self.0 - rem).saturating_add(SCALE))
        } else {
            Self(self.0 - rem)
        }
    }

    /// Nearest whole number, halves rounded away from zero.
    pub fn round(self) -> Self {
        let rem = self.0 % SCALE;
        if rem >= SCALE / 2 {
            Self((self.0 - rem).saturating_add(SCALE))
        } else if rem <= -SCALE / 2 {
            Self((self.0 - rem).saturating_sub(SCALE))
        } else {
            Self(self.0 - rem)
        }
    }

    /// Drops the fractional part.
    pub fn trunc(self) -> Self {
        Self(self.0 - self.0 % SCALE)
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    /// Returns `default` when this value lies outside `[min, max]`.
    ///
    /// Used to sanitize configuration and user input: an out-of-range value is
    /// replaced rather than pinned to the nearest bound.
    pub fn reset_if_out_of_range(self, min: Self, max: Self, default: Self) -> Self {
        if self < min || self > max {
            default
        } else {
            self
        }
    }
}

fn saturate(value: i128) -> Fxp {
    if value > i64::MAX as i128 {
        Fxp::MAX
    } else if value < i64::MIN as i128 {
        Fxp::MIN
    } else {
        Fxp(value as i64)
    }
}

impl Add for Fxp {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fxp {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fxp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fxp {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Fxp {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        saturate((self.0 as i128 * rhs.0 as i128) / SCALE as i128)
    }
}

impl Neg for Fxp {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl From<i32> for Fxp {
    fn from(value: i32) -> Self {
        Self::from_int(value as i64)
    }
}

impl core::iter::Sum for Fxp {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}
