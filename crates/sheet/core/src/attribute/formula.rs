//! Formula system for attribute base values and pool thresholds.
//!
//! Formulas let configuration express values in terms of other attributes:
//! - Constants (`10`)
//! - Another attribute's maximum or current value (`$st`, `$fp.current`)
//! - The owning attribute's own maximum (threshold boundaries)
//! - Arithmetic combinations (sum, product, quotient, min, max, rounding)
//!
//! ## Examples
//!
//! ```
//! # use sheet_core::attribute::Formula;
//! # use sheet_core::fxp::Fxp;
//! // Basic Speed: (DX + HT) / 4
//! let speed = Formula::Quotient(
//!     Box::new(Formula::Sum(vec![Formula::attr("dx"), Formula::attr("ht")])),
//!     Box::new(Formula::constant(4)),
//! );
//!
//! // Reeling: one third of the pool's maximum, rounded
//! let reeling = Formula::Round(Box::new(Formula::Quotient(
//!     Box::new(Formula::SelfValue),
//!     Box::new(Formula::constant(3)),
//! )));
//! # let _ = (speed, reeling);
//! ```
//!
//! ## Unresolved references
//!
//! A reference that cannot be resolved yields [`Fxp::MIN`], and any formula
//! containing one evaluates to `Fxp::MIN` as a whole.

use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

/// Resolves attribute references during formula evaluation.
pub trait FormulaResolver {
    /// Maximum value of the attribute, or `Fxp::MIN` if unresolved.
    fn maximum(&self, id: &str) -> Fxp;

    /// Current value of the attribute, or `Fxp::MIN` if unresolved.
    fn current(&self, id: &str) -> Fxp;
}

// ============================================================================
// Formula Definition
// ============================================================================

/// Formula for calculating a fixed-point value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    /// Fixed constant value.
    Constant(Fxp),

    /// The owning attribute's maximum (threshold boundaries).
    SelfValue,

    /// Maximum value of another attribute.
    Attr(String),

    /// Current value of another attribute.
    AttrCurrent(String),

    /// Sum of multiple formulas.
    Sum(Vec<Formula>),

    /// Product of multiple formulas.
    Product(Vec<Formula>),

    /// First formula divided by the second.
    Quotient(Box<Formula>, Box<Formula>),

    Negate(Box<Formula>),

    Floor(Box<Formula>),

    Ceil(Box<Formula>),

    /// Nearest whole number, halves away from zero.
    Round(Box<Formula>),

    /// Minimum of multiple formulas.
    Min(Vec<Formula>),

    /// Maximum of multiple formulas.
    Max(Vec<Formula>),
}

impl Formula {
    pub fn constant(value: i64) -> Self {
        Formula::Constant(Fxp::from_int(value))
    }

    pub fn attr(id: impl Into<String>) -> Self {
        Formula::Attr(id.into())
    }

    /// Evaluates the formula.
    ///
    /// `self_value` is substituted for [`Formula::SelfValue`].
    pub fn evaluate<R>(&self, resolver: &R, self_value: Fxp) -> Fxp
    where
        R: FormulaResolver + ?Sized,
    {
        match self {
            Formula::Constant(value) => *value,
            Formula::SelfValue => self_value,
            Formula::Attr(id) => resolver.maximum(id),
            Formula::AttrCurrent(id) => resolver.current(id),
            Formula::Sum(formulas) => {
                fold_all(formulas, resolver, self_value, Fxp::ZERO, |acc, v| acc + v)
            }
            Formula::Product(formulas) => {
                if formulas.is_empty() {
                    return Fxp::ZERO;
                }
                fold_all(formulas, resolver, self_value, Fxp::ONE, |acc, v| acc * v)
            }
            Formula::Quotient(numerator, denominator) => {
                let n = numerator.evaluate(resolver, self_value);
                let d = denominator.evaluate(resolver, self_value);
                if n.is_unresolved() || d.is_unresolved() {
                    return Fxp::MIN;
                }
                match n.div(d) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!("Formula {:?} failed: {}", self, e);
                        Fxp::MIN
                    }
                }
            }
            Formula::Negate(inner) => unary(inner, resolver, self_value, |v| -v),
            Formula::Floor(inner) => unary(inner, resolver, self_value, Fxp::floor),
            Formula::Ceil(inner) => unary(inner, resolver, self_value, Fxp::ceil),
            Formula::Round(inner) => unary(inner, resolver, self_value, Fxp::round),
            Formula::Min(formulas) => {
                if formulas.is_empty() {
                    return Fxp::ZERO;
                }
                fold_all(formulas, resolver, self_value, Fxp::MAX, Fxp::min)
            }
            Formula::Max(formulas) => {
                if formulas.is_empty() {
                    return Fxp::ZERO;
                }
                // MIN as the seed is safe: unresolved operands short-circuit first
                fold_all(formulas, resolver, self_value, Fxp::MIN, Fxp::max)
            }
        }
    }
}

impl From<Fxp> for Formula {
    fn from(value: Fxp) -> Self {
        Formula::Constant(value)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn unary<R>(inner: &Formula, resolver: &R, self_value: Fxp, op: impl Fn(Fxp) -> Fxp) -> Fxp
where
    R: FormulaResolver + ?Sized,
{
    let value = inner.evaluate(resolver, self_value);
    if value.is_unresolved() {
        Fxp::MIN
    } else {
        op(value)
    }
}

fn fold_all<R>(
    formulas: &[Formula],
    resolver: &R,
    self_value: Fxp,
    seed: Fxp,
    op: impl Fn(Fxp, Fxp) -> Fxp,
) -> Fxp
where
    R: FormulaResolver + ?Sized,
{
    let mut acc = seed;
    for formula in formulas {
        let value = formula.evaluate(resolver, self_value);
        if value.is_unresolved() {
            return Fxp::MIN;
        }
        acc = op(acc, value);
    }
    acc
}

impl Fingerprint for Formula {
    fn crc64(&self, crc: u64) -> u64 {
        let list = |crc: u64, tag: i64, formulas: &[Formula]| {
            let crc = crc::number(crc::number(crc, tag), formulas.len() as i64);
            formulas.iter().fold(crc, |crc, f| f.crc64(crc))
        };
        match self {
            Formula::Constant(value) => crc::fxp(crc::number(crc, 0), *value),
            Formula::SelfValue => crc::number(crc, 1),
            Formula::Attr(id) => crc::string(crc::number(crc, 2), id),
            Formula::AttrCurrent(id) => crc::string(crc::number(crc, 3), id),
            Formula::Sum(formulas) => list(crc, 4, formulas),
            Formula::Product(formulas) => list(crc, 5, formulas),
            Formula::Quotient(n, d) => d.crc64(n.crc64(crc::number(crc, 6))),
            Formula::Negate(inner) => inner.crc64(crc::number(crc, 7)),
            Formula::Floor(inner) => inner.crc64(crc::number(crc, 8)),
            Formula::Ceil(inner) => inner.crc64(crc::number(crc, 9)),
            Formula::Round(inner) => inner.crc64(crc::number(crc, 10)),
            Formula::Min(formulas) => list(crc, 11, formulas),
            Formula::Max(formulas) => list(crc, 12, formulas),
        }
    }
}
