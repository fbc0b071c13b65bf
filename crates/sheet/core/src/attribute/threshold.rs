//! Pool thresholds - named states reached as a pool depletes.

use super::formula::{Formula, FormulaResolver};
use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

/// Side effects a threshold state imposes on the character.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ThresholdOp {
    /// Move is halved while in this state.
    HalveMove,
    /// Dodge is halved while in this state.
    HalveDodge,
    /// ST is halved while in this state.
    HalveSt,
}

/// A named state (e.g. "Collapse") with a boundary formula over the pool's
/// maximum.
///
/// Within one attribute, thresholds are evaluated in list order and the first
/// whose boundary the current value has reached (`current <= boundary`) is
/// the active one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolThreshold {
    pub state: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "String::is_empty")
    )]
    pub explanation: String,
    pub boundary: Formula,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub ops: Vec<ThresholdOp>,
}

impl PoolThreshold {
    pub fn new(state: impl Into<String>, boundary: Formula) -> Self {
        Self {
            state: state.into(),
            explanation: String::new(),
            boundary,
            ops: Vec::new(),
        }
    }

    /// Attaches explanation text (builder pattern).
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Attaches an effect tag (builder pattern).
    #[must_use]
    pub fn with_op(mut self, op: ThresholdOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Boundary value for a pool whose maximum is `maximum`.
    ///
    /// The boundary may reference other attributes, so it is evaluated against
    /// the live attribute set every time.
    pub fn threshold<R>(&self, resolver: &R, maximum: Fxp) -> Fxp
    where
        R: FormulaResolver + ?Sized,
    {
        self.boundary.evaluate(resolver, maximum)
    }

    pub fn contains_op(&self, op: ThresholdOp) -> bool {
        self.ops.contains(&op)
    }
}

impl Fingerprint for PoolThreshold {
    fn crc64(&self, crc: u64) -> u64 {
        let mut crc = crc::string(crc, &self.state);
        crc = crc::string(crc, &self.explanation);
        crc = self.boundary.crc64(crc);
        crc = crc::number(crc, self.ops.len() as i64);
        for op in &self.ops {
            crc = crc::number(crc, *op as i64);
        }
        crc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoAttributes;

    impl FormulaResolver for NoAttributes {
        fn maximum(&self, _id: &str) -> Fxp {
            Fxp::MIN
        }

        fn current(&self, _id: &str) -> Fxp {
            Fxp::MIN
        }
    }

    #[test]
    fn boundary_scales_with_maximum() {
        let tired = PoolThreshold::new(
            "Tired",
            Formula::Product(vec![Formula::SelfValue, Formula::Constant(Fxp::HALF)]),
        )
        .with_op(ThresholdOp::HalveMove);
        assert_eq!(tired.threshold(&NoAttributes, Fxp::from_int(20)), Fxp::from_int(10));
        assert_eq!(tired.threshold(&NoAttributes, Fxp::from_int(13)), "6.5".parse().unwrap());
        assert!(tired.contains_op(ThresholdOp::HalveMove));
        assert!(!tired.contains_op(ThresholdOp::HalveSt));
    }

    #[test]
    fn op_names_are_snake_case() {
        assert_eq!(ThresholdOp::HalveDodge.to_string(), "halve_dodge");
        assert_eq!("HALVE_ST".parse::<ThresholdOp>().unwrap(), ThresholdOp::HalveSt);
    }
}
