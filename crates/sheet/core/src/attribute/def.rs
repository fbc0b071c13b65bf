//! Attribute definitions - what attributes a sheet configuration has.

use super::formula::Formula;
use super::threshold::PoolThreshold;
use crate::crc::{self, Fingerprint};
use crate::error::{ErrorSeverity, SheetError};
use crate::fxp::Fxp;

/// IDs the formula and bonus systems reserve for their own variables.
pub const RESERVED_IDS: &[&str] = &["skill", "parry", "block", "dodge", "sm"];

/// Kind of value an attribute holds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum AttributeKind {
    /// Whole-number attribute (ST, DX, Basic Move). Values are floored.
    #[default]
    Integer,
    /// Fractional attribute (Basic Speed).
    Decimal,
    /// Expendable resource (HP, FP) with threshold states. Values are floored.
    Pool,
}

impl AttributeKind {
    /// True when values of this kind are kept whole.
    pub const fn is_whole(self) -> bool {
        !matches!(self, Self::Decimal)
    }
}

/// Errors raised while building an attribute definition registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("attribute ID {id:?} is defined more than once")]
    DuplicateId { id: String },

    #[error("attribute ID {id:?} is empty or reserved")]
    InvalidId { id: String },

    #[error("attribute {id:?} has thresholds but is not a pool")]
    ThresholdsOnNonPool { id: String },
}

impl SheetError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "DEF_DUPLICATE_ID",
            Self::InvalidId { .. } => "DEF_INVALID_ID",
            Self::ThresholdsOnNonPool { .. } => "DEF_THRESHOLDS_ON_NON_POOL",
        }
    }
}

/// Normalizes an attribute ID: lowercase ASCII letters, digits and `_` only.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .filter_map(|c| {
            let c = c.to_ascii_lowercase();
            (c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_').then_some(c)
        })
        .collect()
}

/// Point cost schedule for one attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostFormula {
    /// Points per whole step of adjustment.
    pub per_point: Fxp,
    /// Percent cost reduction per point of positive size modifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adj_percent_per_sm: Fxp,
}

impl CostFormula {
    pub fn per_point(per_point: i64) -> Self {
        Self {
            per_point: Fxp::from_int(per_point),
            adj_percent_per_sm: Fxp::ZERO,
        }
    }

    /// Point cost of `value` steps.
    ///
    /// Reductions (the attribute's own plus the size-modifier adjustment) are
    /// capped at 80% and the result is rounded up to a whole point.
    pub fn compute(&self, value: Fxp, cost_reduction: Fxp, size_modifier: i32) -> Fxp {
        let mut cost = value * self.per_point;
        let mut reduction = cost_reduction;
        if size_modifier > 0 && self.adj_percent_per_sm > Fxp::ZERO {
            reduction += Fxp::from(size_modifier) * self.adj_percent_per_sm;
        }
        if reduction > Fxp::ZERO {
            let reduction = reduction.min(Fxp::EIGHTY);
            cost = cost * (Fxp::HUNDRED - reduction) * ONE_HUNDREDTH;
        }
        cost.ceil()
    }
}

const ONE_HUNDREDTH: Fxp = Fxp::from_raw(crate::fxp::SCALE / 100);

/// Describes one attribute kind of a sheet configuration.
///
/// Owned by the sheet settings and shared read-only by every character that
/// uses them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeDef {
    id: String,
    pub kind: AttributeKind,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "String::is_empty")
    )]
    pub full_name: String,
    /// Base value before adjustment and bonuses.
    pub base: Formula,
    pub cost: CostFormula,
    /// Pool states in evaluation order. Only pools may have thresholds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub thresholds: Vec<PoolThreshold>,
    /// Display order, taken from sequence position when loaded.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) order: i32,
}

impl AttributeDef {
    /// Creates a definition; the ID is sanitized.
    pub fn new(
        id: &str,
        kind: AttributeKind,
        name: impl Into<String>,
        base: Formula,
        cost: CostFormula,
    ) -> Self {
        Self {
            id: sanitize_id(id),
            kind,
            name: name.into(),
            full_name: String::new(),
            base,
            cost,
            thresholds: Vec::new(),
            order: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Sets the display order (builder pattern).
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets the full name (builder pattern).
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Appends a threshold (builder pattern).
    #[must_use]
    pub fn with_threshold(mut self, threshold: PoolThreshold) -> Self {
        self.thresholds.push(threshold);
        self
    }

    /// "Full Name (Name)" when both are set, otherwise whichever is.
    pub fn combined_name(&self) -> String {
        match (self.full_name.is_empty(), self.name.is_empty()) {
            (true, _) => self.name.clone(),
            (false, true) => self.full_name.clone(),
            (false, false) if self.full_name == self.name => self.name.clone(),
            (false, false) => format!("{} ({})", self.full_name, self.name),
        }
    }

    /// Point cost of an adjustment of `value` steps.
    pub fn compute_cost(&self, value: Fxp, cost_reduction: Fxp, size_modifier: i32) -> Fxp {
        self.cost.compute(value, cost_reduction, size_modifier)
    }

    /// Checks the ID and kind constraints.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.is_empty() || RESERVED_IDS.contains(&self.id.as_str()) {
            return Err(DefinitionError::InvalidId {
                id: self.id.clone(),
            });
        }
        if self.kind != AttributeKind::Pool && !self.thresholds.is_empty() {
            return Err(DefinitionError::ThresholdsOnNonPool {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Re-applies ID sanitization after deserialization.
    pub(crate) fn normalize(&mut self) {
        self.id = sanitize_id(&self.id);
    }
}

impl Fingerprint for AttributeDef {
    fn crc64(&self, crc: u64) -> u64 {
        let mut crc = crc::string(crc, &self.id);
        crc = crc::number(crc, self.kind as i64);
        crc = crc::string(crc, &self.name);
        crc = crc::string(crc, &self.full_name);
        crc = self.base.crc64(crc);
        crc = crc::fxp(crc, self.cost.per_point);
        crc = crc::fxp(crc, self.cost.adj_percent_per_sm);
        crc = crc::number(crc, self.thresholds.len() as i64);
        self.thresholds.iter().fold(crc, |crc, t| t.crc64(crc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(id: &str, name: &str, base: Formula, cost: CostFormula) -> AttributeDef {
        AttributeDef::new(id, AttributeKind::Integer, name, base, cost)
    }

    fn pool(id: &str, name: &str, base: Formula, per_point: i64) -> AttributeDef {
        AttributeDef::new(id, AttributeKind::Pool, name, base, CostFormula::per_point(per_point))
    }

    #[test]
    fn sanitizes_ids() {
        assert_eq!(sanitize_id("Basic Speed"), "basicspeed");
        assert_eq!(sanitize_id("basic_move"), "basic_move");
        assert_eq!(sanitize_id("ST!"), "st");
        let def = pool("HP", "HP", Formula::attr("st"), 2);
        assert_eq!(def.id(), "hp");
    }

    #[test]
    fn validation_rules() {
        let reserved = integer("dodge", "Dodge", Formula::constant(8), CostFormula::default());
        assert!(matches!(reserved.validate(), Err(DefinitionError::InvalidId { .. })));

        let empty = integer("??", "", Formula::constant(8), CostFormula::default());
        assert!(matches!(empty.validate(), Err(DefinitionError::InvalidId { .. })));

        let bad = integer("st", "ST", Formula::constant(10), CostFormula::per_point(10))
            .with_threshold(PoolThreshold::new("Weak", Formula::constant(0)));
        assert_eq!(
            bad.validate(),
            Err(DefinitionError::ThresholdsOnNonPool { id: "st".into() })
        );
    }

    #[test]
    fn cost_per_step() {
        let cost = CostFormula::per_point(10);
        assert_eq!(cost.compute(Fxp::ZERO, Fxp::ZERO, 0), Fxp::ZERO);
        assert_eq!(cost.compute(Fxp::from_int(2), Fxp::ZERO, 0), Fxp::from_int(20));
        assert_eq!(cost.compute(Fxp::from_int(-1), Fxp::ZERO, 0), Fxp::from_int(-10));
    }

    #[test]
    fn cost_reductions_cap_and_round_up() {
        let hp = CostFormula {
            per_point: Fxp::from_int(2),
            adj_percent_per_sm: Fxp::from_int(10),
        };
        // 5 × 2 = 10, SM +2 → 20% off → 8
        assert_eq!(hp.compute(Fxp::from_int(5), Fxp::ZERO, 2), Fxp::from_int(8));
        // negative SM never reduces
        assert_eq!(hp.compute(Fxp::from_int(5), Fxp::ZERO, -3), Fxp::from_int(10));
        // 90% requested, capped at 80% → 2
        assert_eq!(hp.compute(Fxp::from_int(5), Fxp::from_int(90), 0), Fxp::from_int(2));
        // 3 × 2 = 6, 15% off → 5.1 → 6
        assert_eq!(hp.compute(Fxp::from_int(3), Fxp::from_int(15), 0), Fxp::from_int(6));
    }

    #[test]
    fn combined_name() {
        let def = pool("fp", "FP", Formula::attr("ht"), 3).with_full_name("Fatigue Points");
        assert_eq!(def.combined_name(), "Fatigue Points (FP)");
    }
}
