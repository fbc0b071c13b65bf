//! Attribute instance set and value resolution.
//!
//! [`Attributes`] is the storage: one [`Attribute`] per definition ID, kept in
//! a map with each instance's display order captured alongside it.
//! [`AttributeView`] pairs that storage with the definition registry and
//! computes derived values (current, maximum, point cost, thresholds).
//!
//! # Resolution rules
//!
//! - A known ID resolves through its instance
//! - An unknown ID that parses as a number resolves to that literal value,
//!   so formulas can put constants where an attribute ID is expected
//! - Anything else resolves to [`Fxp::MIN`]; never an error

use std::collections::HashMap;

use super::def::AttributeKind;
use super::defs::AttributeDefs;
use super::formula::FormulaResolver;
use super::instance::Attribute;
use super::threshold::PoolThreshold;
use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

/// Nesting ceiling for attribute-to-attribute formula resolution.
///
/// Definitions referencing each other in a cycle hit this and resolve to
/// `Fxp::MIN` instead of overflowing the stack.
pub const MAX_FORMULA_DEPTH: usize = 32;

/// The live attribute values of one character.
///
/// The key space always mirrors the owning configuration's definition IDs
/// (see [`Attributes::reconcile`]). Nothing observes map iteration order:
/// [`Attributes::list`] sorts on the captured display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    set: HashMap<String, Attribute>,
}

impl Attributes {
    /// Builds one instance per definition, copying display order from the
    /// registry.
    pub fn new(defs: &AttributeDefs) -> Self {
        let set = defs
            .list()
            .into_iter()
            .map(|def| (def.id().to_owned(), Attribute::new(def.id(), def.order())))
            .collect();
        Self { set }
    }

    /// Builds from a stored sequence; position becomes display order.
    pub fn from_list(list: Vec<Attribute>) -> Self {
        let mut set = HashMap::with_capacity(list.len());
        for (i, mut attr) in list.into_iter().enumerate() {
            attr.order = i as i32;
            set.insert(attr.id().to_owned(), attr);
        }
        Self { set }
    }

    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.set.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        self.set.get_mut(id)
    }

    /// Instances sorted by display order (ID breaks ties).
    pub fn list(&self) -> Vec<&Attribute> {
        let mut list: Vec<&Attribute> = self.set.values().collect();
        list.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id().cmp(b.id())));
        list
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Makes the key space match `defs`.
    ///
    /// Instances without a definition are dropped; definitions without an
    /// instance get a fresh one (zero adjustment) placed after the existing
    /// instances in registry order. Returns true if anything changed.
    pub fn reconcile(&mut self, defs: &AttributeDefs) -> bool {
        let before = self.set.len();
        self.set.retain(|id, _| {
            let keep = defs.contains(id);
            if !keep {
                tracing::debug!("Dropping attribute '{}': no longer defined", id);
            }
            keep
        });
        let mut changed = self.set.len() != before;

        let mut next_order = self.set.values().map(|a| a.order + 1).max().unwrap_or(0);
        for def in defs.list() {
            if !self.set.contains_key(def.id()) {
                tracing::debug!("Synthesizing attribute '{}' at order {}", def.id(), next_order);
                self.set
                    .insert(def.id().to_owned(), Attribute::new(def.id(), next_order));
                next_order += 1;
                changed = true;
            }
        }
        changed
    }

    /// Resolving view over these instances.
    pub fn view<'a>(&'a self, defs: &'a AttributeDefs) -> AttributeView<'a> {
        AttributeView::new(self, defs)
    }

    /// Adjusts the instance so its maximum becomes `value`.
    ///
    /// Returns false when the ID is unknown or its maximum is unresolved.
    pub fn set_maximum(&mut self, defs: &AttributeDefs, id: &str, value: Fxp) -> bool {
        let current_max = self.view(defs).maximum_of(id);
        let Some(current_max) = current_max.filter(|v| !v.is_unresolved()) else {
            return false;
        };
        if let Some(attr) = self.set.get_mut(id) {
            attr.adjustment += value - current_max;
            return true;
        }
        false
    }

    /// Sets the current value: pools record the shortfall from maximum as
    /// damage (never negative), other kinds move their maximum.
    pub fn set_current(&mut self, defs: &AttributeDefs, id: &str, value: Fxp) -> bool {
        let is_pool = defs
            .lookup(id)
            .is_some_and(|def| def.kind == AttributeKind::Pool);
        if !is_pool {
            return self.set_maximum(defs, id, value);
        }
        let Some(maximum) = self.view(defs).maximum_of(id).filter(|v| !v.is_unresolved()) else {
            return false;
        };
        if let Some(attr) = self.set.get_mut(id) {
            attr.damage = (maximum - value).max(Fxp::ZERO);
            return true;
        }
        false
    }
}

impl Fingerprint for Attributes {
    fn crc64(&self, crc: u64) -> u64 {
        let crc = crc::number(crc, self.set.len() as i64);
        self.list().into_iter().fold(crc, |crc, attr| attr.crc64(crc))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Attributes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.list())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Attributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Attribute>::deserialize(deserializer).map(Self::from_list)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Read-only view computing derived attribute values.
#[derive(Clone, Copy, Debug)]
pub struct AttributeView<'a> {
    attributes: &'a Attributes,
    defs: &'a AttributeDefs,
    size_modifier: i32,
    depth: usize,
}

impl<'a> AttributeView<'a> {
    pub fn new(attributes: &'a Attributes, defs: &'a AttributeDefs) -> Self {
        Self {
            attributes,
            defs,
            size_modifier: 0,
            depth: 0,
        }
    }

    /// Size modifier used for cost adjustments (builder pattern).
    #[must_use]
    pub fn with_size_modifier(mut self, size_modifier: i32) -> Self {
        self.size_modifier = size_modifier;
        self
    }

    pub fn attributes(&self) -> &'a Attributes {
        self.attributes
    }

    pub fn defs(&self) -> &'a AttributeDefs {
        self.defs
    }

    /// Current value of `id`, a literal number, or `Fxp::MIN`.
    pub fn current(&self, id: &str) -> Fxp {
        match self.attributes.get(id) {
            Some(attr) => self.attribute_current(attr),
            None => literal(id),
        }
    }

    /// Maximum value of `id`, a literal number, or `Fxp::MIN`.
    pub fn maximum(&self, id: &str) -> Fxp {
        self.maximum_of(id).unwrap_or_else(|| literal(id))
    }

    /// Points spent on `id`; zero when unknown.
    pub fn point_cost(&self, id: &str) -> Fxp {
        self.attributes
            .get(id)
            .map_or(Fxp::ZERO, |attr| self.attribute_cost(attr))
    }

    /// Boundary of the named pool state (case-insensitive).
    ///
    /// `Fxp::MIN` if the attribute, its definition or the state is absent.
    pub fn pool_threshold(&self, id: &str, state: &str) -> Fxp {
        let Some(attr) = self.attributes.get(id) else {
            return Fxp::MIN;
        };
        let Some(def) = self.defs.lookup(id) else {
            return Fxp::MIN;
        };
        def.thresholds
            .iter()
            .find(|t| t.state.eq_ignore_ascii_case(state))
            .map_or(Fxp::MIN, |t| self.threshold_value(attr, t))
    }

    /// The active threshold of a pool: the first, in list order, whose
    /// boundary the current value has reached.
    pub fn current_threshold(&self, id: &str) -> Option<&'a PoolThreshold> {
        let attr = self.attributes.get(id)?;
        let def = self.defs.lookup(id)?;
        let current = self.attribute_current(attr);
        if current.is_unresolved() {
            return None;
        }
        def.thresholds
            .iter()
            .find(|t| current <= self.threshold_value(attr, t))
    }

    /// Sum of every attribute's point cost.
    pub fn total_cost(&self) -> Fxp {
        self.attributes
            .list()
            .into_iter()
            .map(|attr| self.attribute_cost(attr))
            .sum()
    }

    /// Base value plus adjustment and bonus; floored for whole kinds.
    pub fn attribute_maximum(&self, attr: &Attribute) -> Fxp {
        let Some(def) = self.defs.lookup(attr.id()) else {
            tracing::warn!("Unable to locate definition for attribute '{}'", attr.id());
            return Fxp::MIN;
        };
        let Some(deeper) = self.deeper(attr.id()) else {
            return Fxp::MIN;
        };
        let base = def.base.evaluate(&deeper, Fxp::ZERO);
        if base.is_unresolved() {
            return Fxp::MIN;
        }
        let maximum = base + attr.adjustment + attr.bonus;
        if def.kind.is_whole() {
            maximum.floor()
        } else {
            maximum
        }
    }

    /// Maximum minus damage for pools, maximum otherwise.
    pub fn attribute_current(&self, attr: &Attribute) -> Fxp {
        let maximum = self.attribute_maximum(attr);
        match self.defs.lookup(attr.id()) {
            Some(def) if def.kind == AttributeKind::Pool && !maximum.is_unresolved() => {
                maximum - attr.damage
            }
            _ => maximum,
        }
    }

    pub fn attribute_cost(&self, attr: &Attribute) -> Fxp {
        self.defs.lookup(attr.id()).map_or(Fxp::ZERO, |def| {
            def.compute_cost(attr.adjustment, attr.cost_reduction, self.size_modifier)
        })
    }

    fn maximum_of(&self, id: &str) -> Option<Fxp> {
        self.attributes
            .get(id)
            .map(|attr| self.attribute_maximum(attr))
    }

    fn threshold_value(&self, attr: &Attribute, threshold: &PoolThreshold) -> Fxp {
        let maximum = self.attribute_maximum(attr);
        if maximum.is_unresolved() {
            return Fxp::MIN;
        }
        match self.deeper(attr.id()) {
            Some(deeper) => threshold.threshold(&deeper, maximum),
            None => Fxp::MIN,
        }
    }

    fn deeper(&self, id: &str) -> Option<Self> {
        if self.depth >= MAX_FORMULA_DEPTH {
            tracing::warn!(
                "Formula resolution for '{}' exceeded depth {}; treating as unresolved",
                id,
                MAX_FORMULA_DEPTH
            );
            return None;
        }
        Some(Self {
            depth: self.depth + 1,
            ..*self
        })
    }
}

impl FormulaResolver for AttributeView<'_> {
    fn maximum(&self, id: &str) -> Fxp {
        AttributeView::maximum(self, id)
    }

    fn current(&self, id: &str) -> Fxp {
        AttributeView::current(self, id)
    }
}

fn literal(id: &str) -> Fxp {
    id.parse().unwrap_or(Fxp::MIN)
}
